//! Fixed-capacity memoization.
use std::collections::HashMap;
use std::hash::Hash;

/// A map that holds at most `capacity` entries.
///
/// Once full, new keys are simply not admitted: there is no eviction,
/// existing entries stay valid for the lifetime of the cache.
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    inner: HashMap<K, V>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl<K: Eq + Hash, V: Clone> BoundedCache<K, V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: HashMap::new(),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Look a key up, counting the hit or miss.
    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.inner.get(key) {
            Some(v) => {
                self.hits += 1;
                Some(v.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a value if there is room left (or if the key is already present).
    ///
    /// Returns `true` if the value has been stored.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.inner.len() >= self.capacity && !self.inner.contains_key(&key) {
            return false;
        }
        self.inner.insert(key, value);
        true
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::BoundedCache;

    #[test]
    fn stops_admitting_when_full() {
        let mut cache = BoundedCache::with_capacity(2);
        assert!(cache.insert(1, "a"));
        assert!(cache.insert(2, "b"));
        assert!(cache.is_full());

        assert!(!cache.insert(3, "c"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&3), None);

        // old entries are kept
        assert_eq!(cache.get(&1), Some("a"));
        assert_eq!(cache.get(&2), Some("b"));
    }

    #[test]
    fn existing_key_can_be_updated_when_full() {
        let mut cache = BoundedCache::with_capacity(1);
        assert!(cache.insert("k", 1));
        assert!(cache.insert("k", 2));
        assert_eq!(cache.get(&"k"), Some(2));
    }

    #[test]
    fn zero_capacity_never_stores() {
        let mut cache: BoundedCache<u64, u8> = BoundedCache::with_capacity(0);
        assert!(!cache.insert(0, 0));
        assert!(cache.is_empty());
    }

    #[test]
    fn counts_hits_and_misses() {
        let mut cache = BoundedCache::with_capacity(4);
        cache.insert(1, 1);
        cache.get(&1);
        cache.get(&1);
        cache.get(&2);
        assert_eq!(cache.hits(), 2);
        assert_eq!(cache.misses(), 1);
    }
}
