//! First-seen key filtering.
//!
//! A batch can carry several records for the same entity. [`FirstSeen`]
//! remembers every key it has accepted so that only the *first* occurrence
//! of each key is forwarded, preserving the order of the input.

use std::hash::Hash;

use ahash::AHashSet;

/// Set-backed filter that accepts each key exactly once.
///
/// # Thread safety
///
/// Not thread-safe. Each pipeline run owns its own instance.
pub struct FirstSeen<K> {
    seen: AHashSet<K>,
}

impl<K: Hash + Eq> FirstSeen<K> {
    pub fn new() -> Self {
        Self {
            seen: AHashSet::new(),
        }
    }

    /// Returns `true` if `key` has not been seen before and records it,
    /// `false` if it was already accepted.
    #[inline]
    pub fn check_and_insert(&mut self, key: K) -> bool {
        self.seen.insert(key)
    }

    /// Number of distinct keys accepted so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Clear all state.
    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

impl<K: Hash + Eq> Default for FirstSeen<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_seen_basic() {
        let mut d = FirstSeen::new();
        assert!(d.check_and_insert("BTC".to_string()));
        assert!(d.check_and_insert("ETH".to_string()));
        assert!(!d.check_and_insert("BTC".to_string())); // duplicate
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn first_seen_is_case_sensitive() {
        let mut d = FirstSeen::new();
        assert!(d.check_and_insert("btc"));
        assert!(d.check_and_insert("BTC"));
        assert!(!d.check_and_insert("BTC"));
    }

    #[test]
    fn first_seen_clear() {
        let mut d = FirstSeen::new();
        assert!(d.check_and_insert(1u64));
        d.clear();
        assert!(d.is_empty());
        assert!(d.check_and_insert(1u64));
    }
}
