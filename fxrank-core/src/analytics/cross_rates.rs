//! Cross-rate generation from a EUR-quoted feed.
//!
//! The feed gives, per date, how many units of each currency one EUR buys.
//! Every directed pair is derived from those: `rate(base, quote) =
//! base_per_eur / quote_per_eur`, i.e. base units per 1 quote unit. EUR's own
//! value is fixed at 1.0, so `rate(X, EUR)` is the feed value for X unchanged.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::domain::{Currency, EurRate, Pair, RateObservation};
use crate::error::{FxError, ValidationError};

/// Expand a EUR-quoted series into all `N * (N - 1)` directed pairs per date.
///
/// Output is sorted by `(date, base, quote)`. Empty input gives empty output.
/// Fails with [`FxError::MissingCurrencyData`] on the earliest date lacking a
/// non-EUR currency. Feed rows quoting EUR itself are ignored; a repeated
/// `(date, quote)` keeps the later row.
pub fn generate_cross_rates(eur_series: &[EurRate]) -> Result<Vec<RateObservation>, FxError> {
    let mut by_date: BTreeMap<NaiveDate, HashMap<Currency, f64>> = BTreeMap::new();

    for (row, r) in eur_series.iter().enumerate() {
        if !r.rate.is_finite() {
            return Err(ValidationError::InvalidRate {
                row,
                value: r.rate.to_string(),
            }
            .into());
        }
        if r.rate <= 0.0 {
            return Err(ValidationError::NonPositiveRate {
                date: r.date,
                pair: format!("{}/EUR", r.quote),
                rate: r.rate,
            }
            .into());
        }
        if r.quote == Currency::Eur {
            continue;
        }
        by_date.entry(r.date).or_default().insert(r.quote, r.rate);
    }

    let pairs = Pair::all();
    let mut out = Vec::with_capacity(by_date.len() * pairs.len());

    for (date, mut per_eur) in by_date {
        for currency in Currency::non_eur() {
            if !per_eur.contains_key(&currency) {
                return Err(FxError::MissingCurrencyData { date, currency });
            }
        }
        per_eur.insert(Currency::Eur, 1.0);

        for pair in &pairs {
            let base_per_eur = per_eur[&pair.base];
            let quote_per_eur = per_eur[&pair.quote];
            out.push(RateObservation::new(
                date,
                pair.base,
                pair.quote,
                base_per_eur / quote_per_eur,
            )?);
        }
    }

    out.sort_by_key(|o| o.key());
    Ok(out)
}
