//! Cache Module
//!
//! Provides a fixed-capacity in-memory cache with LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;


use entry::Entry;
use lru::{ListIter, NodeId, RecencyList};

// Re-export public types
pub use stats::CacheStats;
pub use store::{Iter, LruCache};
