//! Duplicate-alert suppression.

use std::collections::HashSet;

use super::deal::DealKey;

/// Set of recently alerted deal keys, bounded by a full reset at a
/// configured high-water mark.
///
/// When the set already holds more than `max_entries` keys, the next
/// insertion clears it entirely before inserting. That means previously
/// alerted deals can resurface after a reset; the contract here is
/// bounded memory, not perfect recency. An LRU would avoid the cliff-edge
/// but changes the externally observable resurfacing behavior, so the
/// reset is kept as-is.
#[derive(Debug, Default)]
pub struct DedupCache {
    seen: HashSet<DealKey>,
    max_entries: usize,
}

impl DedupCache {
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            seen: HashSet::new(),
            max_entries,
        }
    }

    /// Whether this key has already been alerted on since the last reset.
    pub fn contains(&self, key: &DealKey) -> bool {
        self.seen.contains(key)
    }

    /// Record a key, resetting the whole cache first if it has grown past
    /// the high-water mark. Idempotent for keys already present.
    pub fn insert(&mut self, key: DealKey) {
        if self.seen.len() > self.max_entries {
            tracing::debug!(
                entries = self.seen.len(),
                max_entries = self.max_entries,
                "dedup cache over high-water mark, resetting"
            );
            self.seen.clear();
        }
        self.seen.insert(key);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn key(n: u32) -> DealKey {
        DealKey {
            site: "BUFF".into(),
            name: format!("item-{n}"),
            price: Decimal::from(n),
        }
    }

    #[test]
    fn insert_then_contains() {
        let mut cache = DedupCache::new(100);
        assert!(!cache.contains(&key(1)));
        cache.insert(key(1));
        assert!(cache.contains(&key(1)));
        assert!(!cache.contains(&key(2)));
    }

    #[test]
    fn insert_is_idempotent() {
        let mut cache = DedupCache::new(100);
        cache.insert(key(1));
        cache.insert(key(1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn resets_fully_past_high_water_mark() {
        let mut cache = DedupCache::new(10);
        for n in 0..11 {
            cache.insert(key(n));
        }
        assert_eq!(cache.len(), 11);

        // The next insertion sees len > max and starts from empty.
        cache.insert(key(100));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&key(100)));
        assert!(!cache.contains(&key(0)), "old keys may resurface");
    }
}
