//! Configuration Module
//!
//! Handles loading and managing server and cache configuration from
//! environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CacheConfig, TrustedPackages};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Redis connection URL; the in-memory backend is used when unset
    pub redis_url: Option<String>,
    /// Default TTL in seconds for entries without explicit TTL
    pub default_ttl: u64,
    /// Per-command backend timeout in milliseconds
    pub command_timeout_ms: u64,
    /// Discriminator prefixes allowed for reconstruction
    pub trusted_packages: Vec<String>,
    /// Maximum number of entries the in-memory backend holds
    pub max_entries: usize,
    /// In-memory backend cleanup interval in seconds
    pub cleanup_interval: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Redis URL (default: unset, in-memory backend)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 30)
    /// - `CACHE_COMMAND_TIMEOUT_MS` - Backend command timeout, at least 1 (default: 500)
    /// - `CACHE_TRUSTED_PACKAGES` - Comma-separated prefixes (default: `erp_cache::workflow`)
    /// - `MAX_ENTRIES` - In-memory capacity (default: 1000)
    /// - `CLEANUP_INTERVAL` - In-memory sweep frequency in seconds (default: 1)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            redis_url: env::var("REDIS_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            default_ttl: parse_var("CACHE_DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            command_timeout_ms: parse_var::<u64>("CACHE_COMMAND_TIMEOUT_MS")
                .unwrap_or(defaults.command_timeout_ms)
                .max(1),
            trusted_packages: env::var("CACHE_TRUSTED_PACKAGES")
                .ok()
                .map(|v| split_list(&v))
                .filter(|list| !list.is_empty())
                .unwrap_or(defaults.trusted_packages),
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Settings handed to the cache manager.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            default_ttl: Duration::from_secs(self.default_ttl),
            command_timeout: Duration::from_millis(self.command_timeout_ms.max(1)),
            ..CacheConfig::default()
        }
    }

    pub fn trusted(&self) -> TrustedPackages {
        TrustedPackages::new(self.trusted_packages.iter().cloned())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: None,
            default_ttl: 30,
            command_timeout_ms: 500,
            trusted_packages: vec!["erp_cache::workflow".to_string()],
            max_entries: 1000,
            cleanup_interval: 1,
            server_port: 3000,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
