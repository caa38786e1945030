//! Typed JSON Codec Module
//!
//! Serializes cache values to JSON with an embedded type discriminator and
//! reconstructs them through a closed registry of trusted types.
//!
//! Object values carry the discriminator as an `"@class"` property:
//!
//! ```text
//! {"@class":"erp_cache::workflow::ApproveGroupUser","id":7,"createTime":"2021-11-03T18:55:14"}
//! ```
//!
//! Anything else (strings, numbers, arrays, null) is wrapped as
//! `["<discriminator>", <value>]`.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{CacheError, Result};

/// Name of the discriminator property on object payloads.
pub const TYPE_PROPERTY: &str = "@class";

// == Cache Value ==
/// A type that may be stored in the cache.
///
/// `TYPE_TAG` is the discriminator written next to the value. It is a
/// `::`-separated path and must fall under one of the codec's trusted packages.
pub trait CacheValue: Serialize + DeserializeOwned + Send + Sync + 'static {
    const TYPE_TAG: &'static str;
}

// == Trusted Packages ==
/// Immutable allow-list of discriminator prefixes accepted for reconstruction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedPackages {
    prefixes: Vec<String>,
}

impl TrustedPackages {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|p| {
                    let p: String = p.into();
                    p.trim_end_matches("::").to_string()
                })
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// True when `tag` is a trusted package itself or lives beneath one.
    pub fn allows(&self, tag: &str) -> bool {
        self.prefixes.iter().any(|prefix| {
            tag == prefix
                || tag
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with("::"))
        })
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

type DecodeFn = fn(Value) -> serde_json::Result<Box<dyn Any + Send + Sync>>;

fn decode_boxed<T: CacheValue>(value: Value) -> serde_json::Result<Box<dyn Any + Send + Sync>> {
    Ok(Box::new(serde_json::from_value::<T>(value)?))
}

// == Type Registry ==
/// Closed mapping from discriminator to reconstruction function.
pub struct TypeRegistry {
    trusted: TrustedPackages,
    decoders: HashMap<&'static str, DecodeFn>,
}

impl TypeRegistry {
    pub fn new(trusted: TrustedPackages) -> Self {
        Self {
            trusted,
            decoders: HashMap::new(),
        }
    }

    /// Adds `T` to the registry. Types outside the trusted packages are refused.
    pub fn register<T: CacheValue>(&mut self) -> Result<()> {
        if !self.trusted.allows(T::TYPE_TAG) {
            return Err(CacheError::UntrustedType(T::TYPE_TAG.to_string()));
        }
        self.decoders.insert(T::TYPE_TAG, decode_boxed::<T>);
        Ok(())
    }

    /// Builder form of [`TypeRegistry::register`].
    pub fn with<T: CacheValue>(mut self) -> Result<Self> {
        self.register::<T>()?;
        Ok(self)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    pub fn trusted(&self) -> &TrustedPackages {
        &self.trusted
    }

    fn decoder(&self, tag: &str) -> Result<DecodeFn> {
        if !self.trusted.allows(tag) {
            return Err(CacheError::UntrustedType(tag.to_string()));
        }
        self.decoders
            .get(tag)
            .copied()
            .ok_or_else(|| CacheError::UnknownType(tag.to_string()))
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&&str> = self.decoders.keys().collect();
        tags.sort();
        f.debug_struct("TypeRegistry")
            .field("trusted", &self.trusted)
            .field("types", &tags)
            .finish()
    }
}

// == Cached Value ==
/// A value reconstructed from its discriminator alone.
pub struct CachedValue {
    tag: String,
    value: Box<dyn Any + Send + Sync>,
}

impl CachedValue {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is<T: CacheValue>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Recovers the concrete value.
    pub fn downcast<T: CacheValue>(self) -> Result<T> {
        let tag = self.tag;
        self.value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| CacheError::TypeMismatch {
                expected: T::TYPE_TAG.to_string(),
                found: tag,
            })
    }
}

impl fmt::Debug for CachedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedValue").field("tag", &self.tag).finish_non_exhaustive()
    }
}

// == Typed JSON Codec ==
/// JSON codec that embeds and checks type discriminators.
#[derive(Debug, Clone)]
pub struct TypedJsonCodec {
    registry: Arc<TypeRegistry>,
}

impl TypedJsonCodec {
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    // == Encode ==
    /// Serializes `value` with its discriminator.
    ///
    /// Unregistered types are refused so nothing unreadable gets written.
    pub fn encode<T: CacheValue>(&self, value: &T) -> Result<String> {
        if !self.registry.contains(T::TYPE_TAG) {
            return Err(CacheError::UnknownType(T::TYPE_TAG.to_string()));
        }

        let tagged = match serde_json::to_value(value)? {
            Value::Object(mut map) => {
                map.insert(TYPE_PROPERTY.to_string(), Value::String(T::TYPE_TAG.to_string()));
                Value::Object(map)
            }
            other => Value::Array(vec![Value::String(T::TYPE_TAG.to_string()), other]),
        };

        Ok(serde_json::to_string(&tagged)?)
    }

    // == Decode ==
    /// Reconstructs a `T`, rejecting payloads tagged with any other type.
    pub fn decode<T: CacheValue>(&self, payload: &str) -> Result<T> {
        let (tag, inner) = split_discriminator(payload)?;
        self.registry.decoder(&tag)?;

        if tag != T::TYPE_TAG {
            return Err(CacheError::TypeMismatch {
                expected: T::TYPE_TAG.to_string(),
                found: tag,
            });
        }

        Ok(serde_json::from_value(inner)?)
    }

    /// Reconstructs whatever registered type the payload names.
    pub fn decode_any(&self, payload: &str) -> Result<CachedValue> {
        let (tag, inner) = split_discriminator(payload)?;
        let decode = self.registry.decoder(&tag)?;
        let value = decode(inner)?;
        Ok(CachedValue { tag, value })
    }
}

/// Separates the discriminator from the value it annotates.
fn split_discriminator(payload: &str) -> Result<(String, Value)> {
    let missing = || CacheError::Serialization("payload has no type discriminator".to_string());

    match serde_json::from_str::<Value>(payload)? {
        Value::Object(mut map) => match map.remove(TYPE_PROPERTY) {
            Some(Value::String(tag)) => Ok((tag, Value::Object(map))),
            _ => Err(missing()),
        },
        Value::Array(items) if items.len() == 2 => {
            let mut items = items.into_iter();
            match (items.next(), items.next()) {
                (Some(Value::String(tag)), Some(inner)) => Ok((tag, inner)),
                _ => Err(missing()),
            }
        }
        _ => Err(missing()),
    }
}
