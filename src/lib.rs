//! LRU Bucket - bounded in-memory building blocks
//!
//! Provides a fixed-capacity LRU cache with O(1) get/put and a token-bucket
//! rate limiter with O(1) admission decisions.

pub mod cache;
pub mod config;
pub mod error;
pub mod limiter;

pub use cache::{CacheStats, LruCache};
pub use config::{BucketConfig, CacheConfig, Config};
pub use error::{Error, Result};
pub use limiter::{BucketStats, Clock, ManualClock, MonotonicClock, TokenBucket};
