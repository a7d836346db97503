//! Bounded FIFO memo of pairwise correlations.

use std::collections::{HashMap, VecDeque};

/// Default number of cached pairs.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Unordered pair of series names. `(a, b)` and `(b, a)` produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey {
    lo: String,
    hi: String,
}

impl PairKey {
    /// Builds the canonical key for an unordered pair.
    pub fn new(a: &str, b: &str) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self {
            lo: lo.to_string(),
            hi: hi.to_string(),
        }
    }

    /// Returns the pair in sorted order.
    pub fn names(&self) -> (&str, &str) {
        (&self.lo, &self.hi)
    }
}

/// Fixed-capacity map from unordered series pair to correlation.
///
/// When an insert would exceed capacity the oldest-inserted entry is
/// evicted, regardless of how often it was read. Re-inserting an existing
/// key updates its value but keeps its original queue position.
#[derive(Debug, Clone)]
pub struct CorrelationCache {
    capacity: usize,
    entries: HashMap<PairKey, f64>,
    order: VecDeque<PairKey>,
    hits: u64,
    misses: u64,
}

impl CorrelationCache {
    /// Creates an empty cache. A `capacity` of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity + 1),
            order: VecDeque::with_capacity(capacity + 1),
            hits: 0,
            misses: 0,
        }
    }

    /// Looks up a pair, recording a hit or miss.
    pub fn get(&mut self, key: &PairKey) -> Option<f64> {
        match self.entries.get(key) {
            Some(&v) => {
                self.hits += 1;
                Some(v)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Returns `true` if the pair is cached, without touching statistics.
    pub fn contains(&self, key: &PairKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts a value, evicting the oldest entry on overflow.
    ///
    /// Returns the evicted key, if any.
    pub fn insert(&mut self, key: PairKey, value: f64) -> Option<PairKey> {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return None;
        }
        self.entries.insert(key.clone(), value);
        self.order.push_back(key);

        if self.order.len() > self.capacity {
            let oldest = self.order.pop_front()?;
            self.entries.remove(&oldest);
            return Some(oldest);
        }
        None
    }

    /// Removes every entry and resets statistics.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Returns the number of cached pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of cached pairs.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of lookups that found a value.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Returns the number of lookups that found nothing.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

impl Default for CorrelationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
