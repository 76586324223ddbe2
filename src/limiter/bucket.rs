//! Token Bucket Module
//!
//! Sustained-rate/burst admission control.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::{is_positive_finite, BucketConfig};
use crate::error::{Error, Result};
use crate::limiter::{BucketStats, Clock, MonotonicClock, DEFAULT_COST};

/// Balance held as `base` tokens at the `anchor` instant.
///
/// The balance at a later instant is `min(capacity, base + elapsed * rate)`,
/// where `elapsed` is the whole time since the anchor. The anchor moves only
/// when tokens are spent or the bucket is full, so how often the balance is
/// read never changes its value.
#[derive(Debug)]
struct BucketState {
    base: f64,
    anchor: Instant,
    admitted: u64,
    rejected: u64,
}

impl BucketState {
    /// Balance after `since_anchor` has elapsed, capped at `capacity`.
    fn balance_after(&self, since_anchor: Duration, rate: f64, capacity: f64) -> f64 {
        (self.base + since_anchor.as_secs_f64() * rate).min(capacity)
    }

    /// Returns the balance at `now`, re-anchoring once the bucket is full.
    fn refill(&mut self, now: Instant, rate: f64, capacity: f64) -> f64 {
        let now = now.max(self.anchor);
        let balance = self.balance_after(now - self.anchor, rate, capacity);
        if balance >= capacity {
            self.base = capacity;
            self.anchor = now;
        }
        balance
    }

    /// Deducts `cost` from `balance` and anchors the remainder at `now`.
    fn spend(&mut self, balance: f64, cost: f64, now: Instant) {
        self.base = (balance - cost).max(0.0);
        self.anchor = now.max(self.anchor);
    }
}

// == Token Bucket ==
/// Token-bucket rate limiter.
///
/// The bucket starts full. Tokens accrue continuously at `refill_rate` per
/// second up to `capacity`, and each admitted request spends its cost.
///
/// A request is admitted when `available >= cost`, so a cost equal to the
/// remaining balance goes through and drains the bucket to zero. A cost larger
/// than `capacity` can never be admitted.
///
/// `allow` takes `&self`: share the bucket through an `Arc` and every call
/// runs its refill/compare/deduct sequence inside one short critical section.
#[derive(Debug)]
pub struct TokenBucket<C = MonotonicClock> {
    capacity: f64,
    rate: f64,
    clock: C,
    state: Mutex<BucketState>,
}

impl TokenBucket<MonotonicClock> {
    // == Constructor ==
    /// Creates a full bucket on the process monotonic clock.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of tokens (burst size)
    /// * `refill_rate` - Tokens added per second
    pub fn new(capacity: f64, refill_rate: f64) -> Result<Self> {
        Self::with_clock(capacity, refill_rate, MonotonicClock)
    }

    // == From Config ==
    /// Creates a bucket from validated settings.
    pub fn from_config(config: &BucketConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.capacity, config.refill_rate)
    }
}

impl<C: Clock> TokenBucket<C> {
    // == With Clock ==
    /// Creates a full bucket reading time from `clock`.
    ///
    /// # Errors
    /// Returns an error if `capacity` or `refill_rate` is not a positive
    /// finite number.
    pub fn with_clock(capacity: f64, refill_rate: f64, clock: C) -> Result<Self> {
        if !is_positive_finite(capacity) {
            return Err(Error::InvalidBucketCapacity(capacity));
        }
        if !is_positive_finite(refill_rate) {
            return Err(Error::InvalidRefillRate(refill_rate));
        }
        let state = BucketState {
            base: capacity,
            anchor: clock.now(),
            admitted: 0,
            rejected: 0,
        };
        debug!(capacity, refill_rate, "token bucket created");
        Ok(Self {
            capacity,
            rate: refill_rate,
            clock,
            state: Mutex::new(state),
        })
    }

    // == Allow ==
    /// Decides whether a request costing `cost` tokens may proceed.
    ///
    /// Tokens earned up to now are credited first, whatever the outcome. On
    /// admission `cost` is deducted; on rejection the balance is left as
    /// credited. A zero cost is always admitted.
    ///
    /// # Errors
    /// Returns [`Error::InvalidCost`] for a negative or NaN cost.
    pub fn allow(&self, cost: f64) -> Result<bool> {
        if cost.is_nan() || cost < 0.0 {
            debug!(cost, "rejected invalid admission cost");
            return Err(Error::InvalidCost(cost));
        }
        Ok(self.admit(cost))
    }

    // == Allow One ==
    /// Decides whether a request of the default cost (one token) may proceed.
    pub fn allow_one(&self) -> bool {
        self.admit(DEFAULT_COST)
    }

    // == Retry After ==
    /// Returns how long until `cost` tokens will be available.
    ///
    /// `Some(Duration::ZERO)` means the cost would be admitted now. Any other
    /// wait is rounded up, so `allow(cost)` once it has elapsed is admitted
    /// unless other callers spend first. `None` means the cost exceeds the
    /// capacity, or the wait is beyond any representable duration. Nothing is
    /// deducted.
    pub fn retry_after(&self, cost: f64) -> Result<Option<Duration>> {
        if cost.is_nan() || cost < 0.0 {
            return Err(Error::InvalidCost(cost));
        }
        if cost > self.capacity {
            return Ok(None);
        }

        let mut state = self.state.lock();
        let now = self.clock.now().max(state.anchor);
        let balance = state.refill(now, self.rate, self.capacity);
        if balance >= cost {
            return Ok(Some(Duration::ZERO));
        }

        let since_anchor = now - state.anchor;
        let Ok(mut wait) = Duration::try_from_secs_f64((cost - balance) / self.rate) else {
            return Ok(None);
        };
        // Step past float rounding until the balance `allow` would see covers `cost`.
        let mut step = Duration::from_nanos(1);
        loop {
            let Some(at) = since_anchor.checked_add(wait) else {
                return Ok(None);
            };
            if state.balance_after(at, self.rate, self.capacity) >= cost {
                return Ok(Some(wait));
            }
            let Some(next) = wait.checked_add(step) else {
                return Ok(None);
            };
            wait = next;
            step = step.saturating_mul(2);
        }
    }

    // == Available ==
    /// Returns the token balance accrued up to now.
    pub fn available(&self) -> f64 {
        let mut state = self.state.lock();
        state.refill(self.clock.now(), self.rate, self.capacity)
    }

    // == Stats ==
    /// Returns admission counters and the balance accrued up to now.
    pub fn stats(&self) -> BucketStats {
        let mut state = self.state.lock();
        let available = state.refill(self.clock.now(), self.rate, self.capacity);
        BucketStats {
            admitted: state.admitted,
            rejected: state.rejected,
            available,
            capacity: self.capacity,
        }
    }

    // == Capacity ==
    /// Maximum token balance, fixed at construction.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    // == Refill Rate ==
    /// Tokens added per second.
    pub fn refill_rate(&self) -> f64 {
        self.rate
    }

    fn admit(&self, cost: f64) -> bool {
        let mut state = self.state.lock();
        // Read the clock under the lock so refills are applied in time order.
        let now = self.clock.now();
        let balance = state.refill(now, self.rate, self.capacity);

        let admitted = balance >= cost;
        if admitted {
            if cost > 0.0 {
                state.spend(balance, cost, now);
            }
            state.admitted += 1;
        } else {
            state.rejected += 1;
        }
        trace!(cost, admitted, balance, "admission decision");
        admitted
    }
}
