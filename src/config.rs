//! Configuration Module
//!
//! Typed settings for building the cache and the rate limiter.
//!
//! The structs deserialize with serde so the embedding system can load them
//! from whatever source it uses; missing fields fall back to the defaults.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default number of entries held by the LRU cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;
/// Default burst size of the token bucket.
pub const DEFAULT_BUCKET_CAPACITY: f64 = 10.0;
/// Default refill rate of the token bucket, in tokens per second.
pub const DEFAULT_REFILL_RATE: f64 = 5.0;

// == Cache Config ==
/// Settings for an [`LruCache`](crate::LruCache).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of live entries
    pub capacity: usize,
}

impl CacheConfig {
    /// Checks that the capacity is at least 1.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidCacheCapacity(self.capacity));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

// == Bucket Config ==
/// Settings for a [`TokenBucket`](crate::TokenBucket).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BucketConfig {
    /// Maximum number of tokens (burst size)
    pub capacity: f64,
    /// Tokens added per second
    pub refill_rate: f64,
}

impl BucketConfig {
    /// Checks that capacity and refill rate are positive finite numbers.
    pub fn validate(&self) -> Result<()> {
        if !is_positive_finite(self.capacity) {
            return Err(Error::InvalidBucketCapacity(self.capacity));
        }
        if !is_positive_finite(self.refill_rate) {
            return Err(Error::InvalidRefillRate(self.refill_rate));
        }
        Ok(())
    }
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_BUCKET_CAPACITY,
            refill_rate: DEFAULT_REFILL_RATE,
        }
    }
}

// == Config ==
/// Combined settings for both primitives.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cache: CacheConfig,
    pub bucket: BucketConfig,
}

impl Config {
    /// Validates every section, reporting the first failure.
    pub fn validate(&self) -> Result<()> {
        self.cache.validate()?;
        self.bucket.validate()
    }
}

pub(crate) fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
