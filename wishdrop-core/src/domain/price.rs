//! PricePoint and PriceSeries: the daily price history unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

/// One day's price for a single product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Chronologically ascending sequence of daily prices.
///
/// The simulator always produces one point per day with no gaps. Series built
/// from external data through [`PriceSeries::new`] only need to be strictly
/// ascending by date with positive, finite prices. Deserialization goes
/// through the same checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = InvalidInput;

    fn try_from(points: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points
    }
}

impl PriceSeries {
    /// Build a series, checking date order and price sanity.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, InvalidInput> {
        for (i, point) in points.iter().enumerate() {
            if !(point.price.is_finite() && point.price > 0.0) {
                return Err(InvalidInput::NonPositivePrice(point.price));
            }
            if i > 0 && points[i - 1].date >= point.date {
                return Err(InvalidInput::UnorderedSeries { index: i });
            }
        }
        Ok(Self { points })
    }

    /// Wrap points the caller already knows are valid (simulator output).
    pub(crate) fn from_trusted(points: Vec<PricePoint>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].date < w[1].date));
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// The most recent `n` points (all of them if the series is shorter).
    pub fn trailing(&self, n: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    /// Lowest price among the most recent `n` points.
    pub fn trailing_min(&self, n: usize) -> Option<f64> {
        self.trailing(n).iter().map(|p| p.price).reduce(f64::min)
    }

    /// True if every consecutive pair of points is exactly one day apart.
    pub fn is_contiguous(&self) -> bool {
        self.points
            .windows(2)
            .all(|w| (w[1].date - w[0].date).num_days() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn sample_series() -> PriceSeries {
        PriceSeries::new(vec![
            PricePoint::new(day(1), 100.0),
            PricePoint::new(day(2), 98.5),
            PricePoint::new(day(3), 101.25),
        ])
        .unwrap()
    }

    #[test]
    fn trailing_takes_most_recent() {
        let s = sample_series();
        let tail = s.trailing(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].date, day(2));
        assert_eq!(s.trailing(10).len(), 3);
    }

    #[test]
    fn trailing_min_over_window() {
        let s = sample_series();
        assert_eq!(s.trailing_min(3), Some(98.5));
        assert_eq!(s.trailing_min(1), Some(101.25));
        assert_eq!(PriceSeries::default().trailing_min(30), None);
    }

    #[test]
    fn rejects_out_of_order_dates() {
        let err = PriceSeries::new(vec![
            PricePoint::new(day(2), 10.0),
            PricePoint::new(day(1), 11.0),
        ])
        .unwrap_err();
        assert_eq!(err, InvalidInput::UnorderedSeries { index: 1 });
    }

    #[test]
    fn rejects_duplicate_dates() {
        assert!(PriceSeries::new(vec![
            PricePoint::new(day(1), 10.0),
            PricePoint::new(day(1), 11.0),
        ])
        .is_err());
    }

    #[test]
    fn rejects_non_positive_price() {
        let err = PriceSeries::new(vec![PricePoint::new(day(1), 0.0)]).unwrap_err();
        assert_eq!(err, InvalidInput::NonPositivePrice(0.0));
    }

    #[test]
    fn contiguity() {
        assert!(sample_series().is_contiguous());
        let gappy = PriceSeries::new(vec![
            PricePoint::new(day(1), 10.0),
            PricePoint::new(day(3), 11.0),
        ])
        .unwrap();
        assert!(!gappy.is_contiguous());
    }

    #[test]
    fn serializes_as_plain_array() {
        let json = serde_json::to_string(&sample_series()).unwrap();
        assert!(json.starts_with('['));
        let back: PriceSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 3);
    }

    #[test]
    fn deserialize_rejects_invalid_points() {
        let negative = r#"[{"date":"2024-01-05","price":-3.0},{"date":"2024-01-06","price":10.0}]"#;
        assert!(serde_json::from_str::<PriceSeries>(negative).is_err());

        let unordered = r#"[{"date":"2024-01-05","price":3.0},{"date":"2024-01-01","price":10.0}]"#;
        let err = serde_json::from_str::<PriceSeries>(unordered).unwrap_err();
        assert!(err.to_string().contains("not strictly ascending"));
    }
}
