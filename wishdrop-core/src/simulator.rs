//! Synthetic daily price history.
//!
//! A deliberately simple stochastic walk anchored near the current price:
//! the starting level is perturbed, each day applies a small proportional
//! drift, and occasionally a markdown shock models a flash sale. Prices are
//! clamped to a floor so the series never goes non-positive.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{PricePoint, PriceSeries};
use crate::error::{ensure_positive_price, InvalidInput};
use crate::rng::{seeded, RandomSource};

/// Longest history the simulator will produce (100 years of days).
pub const MAX_DAYS: usize = 36_525;

/// Parameters of the price walk. Defaults reproduce the reference model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Series length used when the caller does not ask for one.
    pub days: usize,
    /// Multiplier band for the starting level relative to the current price.
    pub start_band: (f64, f64),
    /// Maximum absolute proportional drift per day.
    pub drift: f64,
    /// Per-day probability of a markdown shock.
    pub shock_probability: f64,
    /// Multiplier band applied on a shock day.
    pub shock_band: (f64, f64),
    /// Minimum price; every emitted point is at least this.
    pub floor: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            days: 60,
            start_band: (0.92, 1.06),
            drift: 0.012,
            shock_probability: 0.05,
            shock_band: (0.90, 0.97),
            floor: 5.0,
        }
    }
}

impl SimulatorConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.days == 0 || self.days > MAX_DAYS {
            return Err(format!(
                "simulator.days must be in 1..={MAX_DAYS}, got {}",
                self.days
            ));
        }
        check_band("simulator.start_band", self.start_band)?;
        check_band("simulator.shock_band", self.shock_band)?;
        if !(self.drift.is_finite() && self.drift >= 0.0) {
            return Err(format!("simulator.drift must be >= 0, got {}", self.drift));
        }
        if !(0.0..=1.0).contains(&self.shock_probability) {
            return Err(format!(
                "simulator.shock_probability must be in [0, 1], got {}",
                self.shock_probability
            ));
        }
        if !(self.floor.is_finite() && self.floor > 0.0) {
            return Err(format!("simulator.floor must be > 0, got {}", self.floor));
        }
        Ok(())
    }
}

fn check_band(name: &str, (low, high): (f64, f64)) -> Result<(), String> {
    if low.is_finite() && high.is_finite() && low > 0.0 && low <= high {
        Ok(())
    } else {
        Err(format!("{name} must satisfy 0 < low <= high, got ({low}, {high})"))
    }
}

/// Generates price histories. Holds only configuration; cheap to share.
#[derive(Debug, Clone, Default)]
pub struct PriceHistorySimulator {
    config: SimulatorConfig,
}

impl PriceHistorySimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Simulate `days` points ending today (local calendar date).
    ///
    /// With `Some(seed)` the result is reproducible; with `None` the
    /// thread-local generator is used.
    pub fn simulate(
        &self,
        current_price: f64,
        days: usize,
        seed: Option<u64>,
    ) -> Result<PriceSeries, InvalidInput> {
        self.simulate_until(chrono::Local::now().date_naive(), current_price, days, seed)
    }

    /// Simulate `days` points with the last one dated `end`.
    pub fn simulate_until(
        &self,
        end: NaiveDate,
        current_price: f64,
        days: usize,
        seed: Option<u64>,
    ) -> Result<PriceSeries, InvalidInput> {
        match seed {
            Some(seed) => self.simulate_with(&mut seeded(seed), end, current_price, days),
            None => self.simulate_with(&mut rand::thread_rng(), end, current_price, days),
        }
    }

    /// Simulate with a caller-supplied random source.
    pub fn simulate_with<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
        end: NaiveDate,
        current_price: f64,
        days: usize,
    ) -> Result<PriceSeries, InvalidInput> {
        let current_price = ensure_positive_price(current_price)?;
        if days == 0 {
            return Err(InvalidInput::NonPositiveDays);
        }
        let too_large = InvalidInput::DayCountTooLarge {
            days,
            max: MAX_DAYS,
        };
        if days > MAX_DAYS {
            return Err(too_large);
        }
        let start = Duration::try_days(days as i64 - 1)
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or(too_large)?;

        let cfg = &self.config;
        let mut p = current_price * rng.uniform(cfg.start_band.0, cfg.start_band.1);
        let mut points = Vec::with_capacity(days);

        for i in 0..days {
            p += rng.uniform(-cfg.drift, cfg.drift) * p;
            if rng.chance(cfg.shock_probability) {
                p *= rng.uniform(cfg.shock_band.0, cfg.shock_band.1);
            }
            p = p.max(cfg.floor);
            points.push(PricePoint::new(start + Duration::days(i as i64), round_cents(p)));
        }

        tracing::debug!(
            current_price,
            days,
            first = points[0].price,
            last = points[days - 1].price,
            "simulated price history"
        );

        Ok(PriceSeries::from_trusted(points))
    }
}

/// Round to two decimal places.
pub fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Simulate with the default model. See [`PriceHistorySimulator::simulate`].
pub fn simulate(
    current_price: f64,
    days: usize,
    seed: Option<u64>,
) -> Result<PriceSeries, InvalidInput> {
    PriceHistorySimulator::default().simulate(current_price, days, seed)
}
