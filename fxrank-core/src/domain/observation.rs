//! Rate rows: the canonical cached observation and the raw EUR-quoted feed row.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::currency::{Currency, Pair};
use crate::error::ValidationError;

/// One cached observation: 1 unit of `quote` equals `rate` units of `base`.
///
/// Unique by `(date, base, quote)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateObservation {
    pub date: NaiveDate,
    pub base: Currency,
    pub quote: Currency,
    pub rate: f64,
}

impl RateObservation {
    /// Build a validated observation: `base != quote` and `rate` positive and finite.
    pub fn new(
        date: NaiveDate,
        base: Currency,
        quote: Currency,
        rate: f64,
    ) -> Result<Self, ValidationError> {
        let pair = Pair::new(base, quote)?;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ValidationError::NonPositiveRate {
                date,
                pair: pair.code(),
                rate,
            });
        }
        Ok(Self {
            date,
            base,
            quote,
            rate,
        })
    }

    pub fn pair(&self) -> Pair {
        Pair {
            base: self.base,
            quote: self.quote,
        }
    }

    /// Uniqueness and sort key.
    pub fn key(&self) -> (NaiveDate, Currency, Currency) {
        (self.date, self.base, self.quote)
    }
}

/// One row of the EUR-quoted feed: 1 EUR equals `rate` units of `quote`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EurRate {
    pub date: NaiveDate,
    pub quote: Currency,
    pub rate: f64,
}

impl EurRate {
    pub fn new(date: NaiveDate, quote: Currency, rate: f64) -> Self {
        Self { date, quote, rate }
    }
}
