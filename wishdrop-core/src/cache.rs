//! Per-session price-series cache.
//!
//! Series are simulated lazily on first request and reused for the rest of a
//! session so a product's chart and advice stay stable across refreshes. The
//! cache is owned by the caller (one per session) and bounded: when full, the
//! least recently used entry is evicted.

use std::collections::{HashMap, VecDeque};

use crate::domain::{PriceSeries, ProductId};

pub const DEFAULT_CAPACITY: usize = 256;

/// Bounded LRU map from product id to its simulated series.
///
/// Recency is a `VecDeque` scanned on every hit, so lookups cost
/// O(capacity). That is cheap at the default of 256 entries; very large
/// configured capacities pay for it on each `get`.
#[derive(Debug, Clone)]
pub struct SeriesCache {
    capacity: usize,
    entries: HashMap<ProductId, PriceSeries>,
    /// Recency order, least recent at the front.
    order: VecDeque<ProductId>,
    hits: u64,
    misses: u64,
}

impl Default for SeriesCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SeriesCache {
    /// A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Look up a series, marking it most recently used.
    pub fn get(&mut self, id: &str) -> Option<&PriceSeries> {
        if self.entries.contains_key(id) {
            self.hits += 1;
            self.touch(id);
            self.entries.get(id)
        } else {
            self.misses += 1;
            None
        }
    }

    /// Insert or replace a series. Returns the evicted id, if any.
    pub fn insert(&mut self, id: impl Into<ProductId>, series: PriceSeries) -> Option<ProductId> {
        let id = id.into();
        if self.entries.contains_key(&id) {
            self.touch(&id);
            self.entries.insert(id, series);
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.order.pop_front().map(|old| {
                self.entries.remove(&old);
                tracing::debug!(product_id = %old, "evicted cached series");
                old
            })
        } else {
            None
        };

        self.order.push_back(id.clone());
        self.entries.insert(id, series);
        evicted
    }

    /// Return the cached series, computing and caching it on a miss.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        id: &str,
        make: impl FnOnce() -> Result<PriceSeries, E>,
    ) -> Result<&PriceSeries, E> {
        if self.get(id).is_none() {
            let series = make()?;
            self.insert(id, series);
        }
        // Capacity >= 1, so the entry just inserted is still resident.
        Ok(&self.entries[id])
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    /// Move `id` to the most recent end. Linear in the number of entries.
    fn touch(&mut self, id: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == id) {
            if let Some(key) = self.order.remove(pos) {
                self.order.push_back(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PricePoint;
    use chrono::NaiveDate;

    fn series(price: f64) -> PriceSeries {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::new(vec![PricePoint::new(d, price)]).unwrap()
    }

    #[test]
    fn get_after_insert() {
        let mut c = SeriesCache::new(4);
        c.insert("P-1", series(10.0));
        assert_eq!(c.get("P-1").unwrap().prices(), vec![10.0]);
        assert!(c.get("P-2").is_none());
        assert_eq!(c.stats(), (1, 1));
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut c = SeriesCache::new(2);
        c.insert("P-1", series(1.0));
        c.insert("P-2", series(2.0));
        // Touch P-1 so P-2 becomes the LRU entry.
        c.get("P-1");
        let evicted = c.insert("P-3", series(3.0));
        assert_eq!(evicted.as_deref(), Some("P-2"));
        assert!(c.contains("P-1"));
        assert!(c.contains("P-3"));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn replace_does_not_evict() {
        let mut c = SeriesCache::new(1);
        c.insert("P-1", series(1.0));
        assert!(c.insert("P-1", series(2.0)).is_none());
        assert_eq!(c.get("P-1").unwrap().prices(), vec![2.0]);
    }

    #[test]
    fn lazy_fill_runs_once() {
        let mut c = SeriesCache::new(8);
        let mut calls = 0;
        for _ in 0..3 {
            let s = c
                .get_or_try_insert_with::<()>("P-1", || {
                    calls += 1;
                    Ok(series(5.0))
                })
                .unwrap();
            assert_eq!(s.len(), 1);
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn lazy_fill_propagates_error_without_caching() {
        let mut c = SeriesCache::new(8);
        let r = c.get_or_try_insert_with("P-1", || Err("boom"));
        assert_eq!(r.unwrap_err(), "boom");
        assert!(c.is_empty());
    }

    #[test]
    fn zero_capacity_is_bumped() {
        let mut c = SeriesCache::new(0);
        assert_eq!(c.capacity(), 1);
        c.insert("P-1", series(1.0));
        c.insert("P-2", series(2.0));
        assert_eq!(c.len(), 1);
        assert!(c.contains("P-2"));
    }
}
