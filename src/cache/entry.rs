//! Cache Entry Module
//!
//! Defines the key/value pair stored in each recency list node.

// == Entry ==
/// A single cached key/value pair.
///
/// The key is kept alongside the value so that evicting the back of the
/// recency list can also clear the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry<K, V> {
    /// The cache key
    pub key: K,
    /// The stored value
    pub value: V,
}

impl<K, V> Entry<K, V> {
    // == Constructor ==
    /// Creates an entry for `key` holding `value`.
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    // == Replace ==
    /// Replaces the value, returning the previous one.
    pub fn replace(&mut self, value: V) -> V {
        std::mem::replace(&mut self.value, value)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_replace_keeps_key() {
        let mut entry = Entry::new("k", 1);
        assert_eq!(entry.replace(2), 1);
        assert_eq!(entry.key, "k");
        assert_eq!(entry.value, 2);
    }
}
