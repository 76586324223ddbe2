//! Bucket Statistics Module
//!
//! Snapshot of admission counters and the current token balance.

use serde::Serialize;

// == Bucket Stats ==
/// Point-in-time view of a token bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BucketStats {
    /// Requests admitted so far
    pub admitted: u64,
    /// Requests rejected for lack of tokens
    pub rejected: u64,
    /// Token balance at the time of the snapshot
    pub available: f64,
    /// Maximum token balance
    pub capacity: f64,
}

impl BucketStats {
    // == Rejection Rate ==
    /// Fraction of decisions that were rejections, or 0.0 before the first.
    pub fn rejection_rate(&self) -> f64 {
        let total = self.admitted + self.rejected;
        if total == 0 {
            0.0
        } else {
            self.rejected as f64 / total as f64
        }
    }

    // == Fill Ratio ==
    /// Fraction of the capacity currently available, or 0.0 without a capacity.
    pub fn fill_ratio(&self) -> f64 {
        if self.capacity > 0.0 {
            self.available / self.capacity
        } else {
            0.0
        }
    }
}
