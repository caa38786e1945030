//! ERP Cache - typed JSON caching for the workflow backend
//!
//! Key generation, discriminator-based serialization with a trusted-type
//! registry, error isolation and TTL-bound named caches over Redis or an
//! in-memory backend, plus the HTTP surface that uses them.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod workflow;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
