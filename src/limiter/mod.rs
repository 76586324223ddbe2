//! Limiter Module
//!
//! Provides a token-bucket rate limiter driven by an injectable monotonic clock.

mod bucket;
mod clock;
mod stats;


// Re-export public types
pub use bucket::TokenBucket;
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use stats::BucketStats;

/// Cost charged by [`TokenBucket::allow_one`].
pub const DEFAULT_COST: f64 = 1.0;
