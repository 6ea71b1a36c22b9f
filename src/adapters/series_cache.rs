//! Parsed-series cache keyed by a fingerprint of the raw file contents.
//!
//! Re-running an analysis on unchanged input (a threshold sweep, say) skips
//! CSV parsing. Invalidation is explicit; nothing expires on its own.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::debug;

use crate::domain::price::PricePoint;

pub const DEFAULT_CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub fn of(content: &[u8]) -> Self {
        let mut hasher = DefaultHasher::new();
        content.len().hash(&mut hasher);
        content.hash(&mut hasher);
        Fingerprint(hasher.finish())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Bounded fingerprint -> series map. On overflow the oldest entry goes.
pub struct SeriesCache {
    capacity: usize,
    entries: HashMap<Fingerprint, Vec<PricePoint>>,
    order: VecDeque<Fingerprint>,
}

impl SeriesCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Fingerprint) -> Option<&[PricePoint]> {
        let hit = self.entries.get(key).map(Vec::as_slice);
        debug!(fingerprint = %key, hit = hit.is_some(), "series cache lookup");
        hit
    }

    pub fn insert(&mut self, key: Fingerprint, series: Vec<PricePoint>) {
        if self.entries.insert(key, series).is_some() {
            return;
        }
        self.order.push_back(key);

        while self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.entries.remove(&evicted);
                debug!(fingerprint = %evicted, "series cache eviction");
            }
        }
    }

    /// Return the cached series for `content`, parsing and storing it on a miss.
    /// A failed parse leaves the cache untouched.
    pub fn get_or_try_insert<E>(
        &mut self,
        content: &[u8],
        parse: impl FnOnce(&[u8]) -> Result<Vec<PricePoint>, E>,
    ) -> Result<Vec<PricePoint>, E> {
        let key = Fingerprint::of(content);
        if let Some(series) = self.get(&key) {
            return Ok(series.to_vec());
        }
        let series = parse(content)?;
        self.insert(key, series.clone());
        Ok(series)
    }

    pub fn invalidate(&mut self, key: &Fingerprint) -> bool {
        self.order.retain(|k| k != key);
        let removed = self.entries.remove(key).is_some();
        if removed {
            debug!(fingerprint = %key, "series cache invalidated");
        }
        removed
    }

    pub fn clear(&mut self) {
        debug!(entries = self.entries.len(), "series cache cleared");
        self.entries.clear();
        self.order.clear();
    }
}

impl Default for SeriesCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
