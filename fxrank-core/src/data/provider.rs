//! Rate provider abstraction.
//!
//! Providers only know how to produce a EUR-quoted series for a date range.
//! The cache sits above this trait; providers never see it.

use chrono::NaiveDate;

use crate::domain::EurRate;
use crate::error::FxError;

/// A source of EUR-quoted daily rates (1 EUR = `rate` units of `quote`).
pub trait EurRateProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Every non-EUR supported currency for each published date in
    /// `start..=end`. Weekends and holidays are simply absent.
    fn fetch_eur_series(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<EurRate>, FxError>;
}
