//! Trailing-window statistics over a price sequence.

use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

/// Summary of the most recent `len` prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub len: usize,
    pub min: f64,
    pub mean: f64,
    /// Average daily change from the window's first to its last price.
    pub slope: f64,
}

impl WindowStats {
    /// Compute stats over the last `window` entries of `prices`.
    ///
    /// The slope is endpoint to endpoint, `(last - first) / max(1, len - 1)`,
    /// not a regression: the decision thresholds are tuned against it.
    pub fn trailing(prices: &[f64], window: usize) -> Result<Self, InvalidInput> {
        if prices.is_empty() || window == 0 {
            return Err(InvalidInput::EmptySeries);
        }
        let w = window.min(prices.len());
        let win = &prices[prices.len() - w..];

        let min = win.iter().copied().fold(f64::INFINITY, f64::min);
        let mean = win.iter().sum::<f64>() / w as f64;
        let slope = (win[w - 1] - win[0]) / (w.saturating_sub(1).max(1)) as f64;

        Ok(Self {
            len: w,
            min,
            mean,
            slope,
        })
    }
}
