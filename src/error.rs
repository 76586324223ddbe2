//! Error types for the cache and rate limiter
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Error Enum ==
/// Unified error type for both primitives.
///
/// Cache misses and rate-limit rejections are ordinary return values and
/// never show up here; only invalid construction parameters and caller
/// contract violations do.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// LRU cache built with a capacity of zero
    #[error("Invalid cache capacity: {0} (must be at least 1)")]
    InvalidCacheCapacity(usize),

    /// Token bucket built with a non-positive or non-finite capacity
    #[error("Invalid bucket capacity: {0} (must be a positive finite number)")]
    InvalidBucketCapacity(f64),

    /// Token bucket built with a non-positive or non-finite refill rate
    #[error("Invalid refill rate: {0} (must be a positive finite number of tokens per second)")]
    InvalidRefillRate(f64),

    /// Admission requested with a negative or NaN cost
    #[error("Invalid cost: {0} (must be non-negative)")]
    InvalidCost(f64),
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_value() {
        assert_eq!(
            Error::InvalidCacheCapacity(0).to_string(),
            "Invalid cache capacity: 0 (must be at least 1)"
        );
        assert!(Error::InvalidCost(-1.5).to_string().contains("-1.5"));
        assert!(Error::InvalidRefillRate(0.0)
            .to_string()
            .starts_with("Invalid refill rate: 0"));
    }
}
