//! Board: saved items plus price-drop tracking thresholds.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::ProductId;

/// Threshold applied when an item is tracked without an explicit one.
pub const DEFAULT_THRESHOLD_PCT: u32 = 10;

/// Valid range for alert thresholds, in percent.
pub const THRESHOLD_RANGE: std::ops::RangeInclusive<u32> = 1..=50;

/// A user's board. Ordered collections keep the persisted JSON stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    #[serde(default)]
    pub saved: BTreeSet<ProductId>,
    #[serde(default)]
    pub tracked: BTreeMap<ProductId, u32>,
}

impl Board {
    /// Save an item. Returns false if it was already saved.
    pub fn save_item(&mut self, id: impl Into<ProductId>) -> bool {
        self.saved.insert(id.into())
    }

    /// Track an item for price alerts, clamping the threshold into range.
    ///
    /// Re-tracking an item replaces its threshold.
    pub fn track(&mut self, id: impl Into<ProductId>, threshold_pct: u32) -> u32 {
        let thr = threshold_pct.clamp(*THRESHOLD_RANGE.start(), *THRESHOLD_RANGE.end());
        self.tracked.insert(id.into(), thr);
        thr
    }

    /// Track an item, keeping any existing threshold. New items get
    /// `default_pct`, clamped into range.
    pub fn track_default(&mut self, id: impl Into<ProductId>, default_pct: u32) -> u32 {
        let thr = default_pct.clamp(*THRESHOLD_RANGE.start(), *THRESHOLD_RANGE.end());
        *self.tracked.entry(id.into()).or_insert(thr)
    }

    pub fn untrack(&mut self, id: &str) -> Option<u32> {
        self.tracked.remove(id)
    }

    pub fn clear_saved(&mut self) {
        self.saved.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty() && self.tracked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_is_idempotent() {
        let mut b = Board::default();
        assert!(b.save_item("P-1000"));
        assert!(!b.save_item("P-1000"));
        assert_eq!(b.saved.len(), 1);
    }

    #[test]
    fn track_clamps_threshold() {
        let mut b = Board::default();
        assert_eq!(b.track("P-1", 0), 1);
        assert_eq!(b.track("P-2", 80), 50);
        assert_eq!(b.track("P-3", 25), 25);
    }

    #[test]
    fn track_default_keeps_existing() {
        let mut b = Board::default();
        b.track("P-1", 30);
        assert_eq!(b.track_default("P-1", DEFAULT_THRESHOLD_PCT), 30);
        assert_eq!(b.track_default("P-2", DEFAULT_THRESHOLD_PCT), DEFAULT_THRESHOLD_PCT);
        assert_eq!(b.track_default("P-3", 90), 50);
        assert_eq!(b.tracked["P-1"], 30);
    }

    #[test]
    fn missing_fields_deserialize_empty() {
        let b: Board = serde_json::from_str("{}").unwrap();
        assert!(b.is_empty());
    }
}
