//! Input validation errors shared by the simulator and the signal engine.

use thiserror::Error;

/// Rejected input to `simulate` or `signal`.
///
/// Both operations validate synchronously and never coerce bad input into a
/// "best effort" result: a caller either gets a full answer or one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("price must be positive and finite, got {0}")]
    NonPositivePrice(f64),

    #[error("day count must be at least 1")]
    NonPositiveDays,

    #[error("day count {days} exceeds the maximum of {max}")]
    DayCountTooLarge { days: usize, max: usize },

    #[error("price series is empty")]
    EmptySeries,

    #[error("price series is not strictly ascending by date at index {index}")]
    UnorderedSeries { index: usize },
}

/// Check that a price is usable as a reference price.
pub(crate) fn ensure_positive_price(price: f64) -> Result<f64, InvalidInput> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(InvalidInput::NonPositivePrice(price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_price_accepted() {
        assert_eq!(ensure_positive_price(12.5), Ok(12.5));
    }

    #[test]
    fn zero_negative_and_nan_rejected() {
        assert!(ensure_positive_price(0.0).is_err());
        assert!(ensure_positive_price(-5.0).is_err());
        assert!(ensure_positive_price(f64::NAN).is_err());
        assert!(ensure_positive_price(f64::INFINITY).is_err());
    }

    #[test]
    fn messages_are_displayable() {
        let msg = InvalidInput::NonPositivePrice(-5.0).to_string();
        assert!(msg.contains("-5"));
        assert_eq!(InvalidInput::EmptySeries.to_string(), "price series is empty");
    }
}
