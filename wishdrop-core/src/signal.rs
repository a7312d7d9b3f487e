//! Buy/wait signal over a price history.
//!
//! The engine scores the current price against trailing-window statistics
//! and maps the score onto three canned recommendations. It is a pure
//! function of `(window, current_price)`: no state, no I/O, no randomness.
//!
//! Scoring, starting from 0:
//! - `current_price <= min * near_low_tolerance` → +2 (at/near the floor)
//! - `current_price < mean` → +1
//! - `slope > 0` → −1, otherwise +1
//!
//! `score >= 2` is BUY, `score <= 0` is WAIT, anything else CONSIDER.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::PriceSeries;
use crate::error::{ensure_positive_price, InvalidInput};
use crate::stats::WindowStats;

/// Categorical advice for the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Buy,
    Wait,
    Consider,
}

impl Recommendation {
    /// Map a score onto a recommendation.
    pub fn from_score(score: i32) -> Self {
        if score >= 2 {
            Recommendation::Buy
        } else if score <= 0 {
            Recommendation::Wait
        } else {
            Recommendation::Consider
        }
    }

    /// The fixed explanation shown with this recommendation.
    pub fn rationale(&self) -> &'static str {
        match self {
            Recommendation::Buy => "Current price is at/near recent lows; good time to buy.",
            Recommendation::Wait => "Price trend is flat or rising; likely to drop later.",
            Recommendation::Consider => "Decent price; not the lowest, but reasonable.",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Buy => "BUY",
            Recommendation::Wait => "WAIT",
            Recommendation::Consider => "CONSIDER",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Trailing window length in points.
    pub window: usize,
    /// Multiplier on the window minimum that still counts as "near lows".
    pub near_low_tolerance: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            window: 30,
            near_low_tolerance: 1.02,
        }
    }
}

impl SignalConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.window == 0 {
            return Err("signal.window must be >= 1".into());
        }
        if !(self.near_low_tolerance.is_finite() && self.near_low_tolerance >= 1.0) {
            return Err(format!(
                "signal.near_low_tolerance must be >= 1.0, got {}",
                self.near_low_tolerance
            ));
        }
        Ok(())
    }
}

/// Full engine output: the recommendation plus how it was reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub recommendation: Recommendation,
    pub rationale: &'static str,
    pub score: i32,
    pub stats: WindowStats,
}

#[derive(Debug, Clone, Default)]
pub struct SignalEngine {
    config: SignalConfig,
}

impl SignalEngine {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Evaluate a price series against the current price.
    pub fn evaluate(&self, series: &PriceSeries, current_price: f64) -> Result<Signal, InvalidInput> {
        self.evaluate_prices(&series.prices(), current_price)
    }

    /// Evaluate a bare price sequence (oldest first).
    pub fn evaluate_prices(&self, prices: &[f64], current_price: f64) -> Result<Signal, InvalidInput> {
        if prices.is_empty() {
            return Err(InvalidInput::EmptySeries);
        }
        let current_price = ensure_positive_price(current_price)?;
        let stats = WindowStats::trailing(prices, self.config.window)?;
        let score = self.score(&stats, current_price);
        let recommendation = Recommendation::from_score(score);

        tracing::debug!(
            current_price,
            min = stats.min,
            mean = stats.mean,
            slope = stats.slope,
            score,
            %recommendation,
            "evaluated signal"
        );

        Ok(Signal {
            recommendation,
            rationale: recommendation.rationale(),
            score,
            stats,
        })
    }

    fn score(&self, stats: &WindowStats, current_price: f64) -> i32 {
        let mut score = 0;
        if current_price <= stats.min * self.config.near_low_tolerance {
            score += 2;
        }
        if current_price < stats.mean {
            score += 1;
        }
        if stats.slope > 0.0 {
            score -= 1;
        } else {
            score += 1;
        }
        score
    }
}

/// Evaluate with the default engine, returning just the recommendation and
/// its rationale.
pub fn signal(
    series: &PriceSeries,
    current_price: f64,
) -> Result<(Recommendation, &'static str), InvalidInput> {
    let s = SignalEngine::default().evaluate(series, current_price)?;
    Ok((s.recommendation, s.rationale))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SignalEngine {
        SignalEngine::default()
    }

    #[test]
    fn score_thresholds() {
        assert_eq!(Recommendation::from_score(4), Recommendation::Buy);
        assert_eq!(Recommendation::from_score(2), Recommendation::Buy);
        assert_eq!(Recommendation::from_score(1), Recommendation::Consider);
        assert_eq!(Recommendation::from_score(0), Recommendation::Wait);
        assert_eq!(Recommendation::from_score(-1), Recommendation::Wait);
    }

    #[test]
    fn flat_window_at_min_is_buy() {
        let s = engine().evaluate_prices(&[50.0; 30], 50.0).unwrap();
        // near lows (+2), not below mean (0), flat (+1)
        assert_eq!(s.score, 3);
        assert_eq!(s.recommendation, Recommendation::Buy);
    }

    #[test]
    fn near_low_boundary_is_inclusive() {
        let s = engine().evaluate_prices(&[100.0; 30], 100.0 * 1.02).unwrap();
        // +2 for near lows, 0 for mean, +1 flat
        assert_eq!(s.score, 3);
    }

    #[test]
    fn just_above_boundary_is_not_near_lows() {
        let s = engine().evaluate_prices(&[100.0; 30], 102.01).unwrap();
        assert_eq!(s.score, 1);
        assert_eq!(s.recommendation, Recommendation::Consider);
        assert_eq!(s.rationale, "Decent price; not the lowest, but reasonable.");
    }

    #[test]
    fn rising_trend_above_mean_is_wait() {
        let prices: Vec<f64> = (0..30).map(|i| 80.0 + i as f64 * 40.0 / 29.0).collect();
        let s = engine().evaluate_prices(&prices, 119.0).unwrap();
        assert_eq!(s.score, -1);
        assert_eq!(s.recommendation, Recommendation::Wait);
    }

    #[test]
    fn only_window_influences_result() {
        // A very low price 31 days ago is outside the 30-day window.
        let mut prices = vec![10.0];
        prices.extend(std::iter::repeat(100.0).take(30));
        let s = engine().evaluate_prices(&prices, 101.0).unwrap();
        assert_eq!(s.stats.min, 100.0);
        assert_eq!(s.recommendation, Recommendation::Buy);
    }

    #[test]
    fn custom_window() {
        let engine = SignalEngine::new(SignalConfig {
            window: 2,
            ..Default::default()
        });
        let s = engine.evaluate_prices(&[1.0, 100.0, 90.0], 95.0).unwrap();
        assert_eq!(s.stats.len, 2);
        assert_eq!(s.stats.min, 90.0);
        // 95 <= 91.8? no; 95 < 95? no; slope -10 → +1
        assert_eq!(s.score, 1);
    }

    #[test]
    fn empty_and_bad_price_rejected() {
        assert_eq!(
            engine().evaluate_prices(&[], 10.0),
            Err(InvalidInput::EmptySeries)
        );
        assert_eq!(
            engine().evaluate_prices(&[10.0], 0.0),
            Err(InvalidInput::NonPositivePrice(0.0))
        );
    }

    #[test]
    fn display_and_serde_labels() {
        assert_eq!(Recommendation::Consider.to_string(), "CONSIDER");
        assert_eq!(
            serde_json::to_string(&Recommendation::Buy).unwrap(),
            "\"BUY\""
        );
    }

    #[test]
    fn config_validation() {
        assert!(SignalConfig::default().validate().is_ok());
        let zero = SignalConfig {
            window: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }
}
