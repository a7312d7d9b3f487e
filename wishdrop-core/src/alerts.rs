//! Price-drop alerts for tracked board items.
//!
//! For a tracked item the alert compares the current price with the lowest
//! price of the trailing 30 days. `proximity_pct = (price - low) / price * 100`
//! says how far above that low the item currently sits; the alert fires when
//! it is within the user's threshold.

use serde::Serialize;

use crate::advisor::Advisor;
use crate::catalog::Catalog;
use crate::domain::{Board, PriceSeries, ProductId};

/// Days of history the alert looks back over.
pub const ALERT_LOOKBACK: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceAlert {
    pub product_id: ProductId,
    pub name: String,
    pub price: f64,
    pub recent_low: f64,
    pub proximity_pct: f64,
    pub threshold_pct: u32,
}

/// Percent distance of `price` above the trailing low of `series`.
///
/// Negative when the current price is below every price in the window.
pub fn low_proximity_pct(series: &PriceSeries, price: f64) -> Option<(f64, f64)> {
    let low = series.trailing_min(ALERT_LOOKBACK)?;
    if price <= 0.0 {
        return None;
    }
    Some((low, (price - low) / price * 100.0))
}

/// Alerts for every tracked item on the board, ordered by product id.
///
/// Ids missing from the catalog, and products whose history cannot be
/// simulated, are skipped.
pub fn evaluate_alerts(board: &Board, catalog: &Catalog, advisor: &mut Advisor) -> Vec<PriceAlert> {
    let mut alerts = Vec::new();
    for (id, &threshold_pct) in &board.tracked {
        let Some(product) = catalog.get_product(id) else {
            tracing::debug!(product_id = %id, "tracked id not in catalog");
            continue;
        };
        let series = match advisor.series_for(product) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(product_id = %id, error = %e, "skipping alert");
                continue;
            }
        };
        let Some((recent_low, proximity_pct)) = low_proximity_pct(series, product.price) else {
            continue;
        };
        if proximity_pct <= threshold_pct as f64 {
            alerts.push(PriceAlert {
                product_id: id.clone(),
                name: product.name.clone(),
                price: product.price,
                recent_low,
                proximity_pct,
                threshold_pct,
            });
        }
    }
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WishdropConfig;
    use crate::domain::product::sample_product;
    use crate::domain::PricePoint;
    use chrono::{Duration, NaiveDate};

    fn series(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::new(
            prices
                .iter()
                .enumerate()
                .map(|(i, &p)| PricePoint::new(start + Duration::days(i as i64), p))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn proximity_over_trailing_window() {
        let mut prices = vec![1.0; 10];
        prices.extend(std::iter::repeat(90.0).take(30));
        let (low, pct) = low_proximity_pct(&series(&prices), 100.0).unwrap();
        assert_eq!(low, 90.0);
        assert!((pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn proximity_negative_below_low() {
        let (_, pct) = low_proximity_pct(&series(&[100.0, 110.0]), 50.0).unwrap();
        assert!(pct < 0.0);
    }

    #[test]
    fn empty_series_has_no_proximity() {
        assert!(low_proximity_pct(&PriceSeries::default(), 10.0).is_none());
    }

    #[test]
    fn alerts_respect_threshold_and_skip_unknown() {
        let catalog = Catalog::new(vec![
            sample_product("P-1", 100.0),
            sample_product("P-2", 300.0),
        ])
        .unwrap();
        let mut advisor = Advisor::from_config(&WishdropConfig::default(), Some(11));

        let mut board = Board::default();
        board.track("P-1", 50);
        board.track("P-2", 1);
        board.track("P-404", 50);

        // Simulated lows sit within a few tens of percent of the price, so a
        // 50% threshold always fires; compute the 1% case from the series.
        let p2 = catalog.get_product("P-2").unwrap().clone();
        let (_, p2_pct) = low_proximity_pct(advisor.series_for(&p2).unwrap(), p2.price).unwrap();

        let alerts = evaluate_alerts(&board, &catalog, &mut advisor);
        let ids: Vec<&str> = alerts.iter().map(|a| a.product_id.as_str()).collect();

        assert!(ids.contains(&"P-1"));
        assert_eq!(ids.contains(&"P-2"), p2_pct <= 1.0);
        assert!(!ids.contains(&"P-404"));
    }
}
