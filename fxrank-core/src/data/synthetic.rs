//! Offline provider producing a deterministic EUR-quoted random walk.
//!
//! Clearly fake data for demos and tests. Each currency walks from a fixed
//! anchor date with an RNG seeded from its code, so the value on any given
//! day is the same no matter which range is requested.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::EurRateProvider;
use crate::domain::{Currency, EurRate};
use crate::error::FxError;

const MAX_DAILY_MOVE: f64 = 0.005;

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    anchor: NaiveDate,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            anchor: NaiveDate::from_ymd_opt(2000, 1, 3).unwrap_or_default(),
        }
    }
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting units per EUR at the anchor date.
    fn starting_level(currency: Currency) -> f64 {
        match currency {
            Currency::Usd => 1.10,
            Currency::Pln => 4.30,
            Currency::Gbp => 0.86,
            Currency::Eur => 1.0,
        }
    }

    fn walk(&self, currency: Currency, start: NaiveDate, end: NaiveDate) -> Vec<EurRate> {
        let seed: [u8; 32] = *blake3::hash(currency.code().as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut rows = Vec::new();
        let mut level = Self::starting_level(currency);
        let mut current = self.anchor;

        while current <= end {
            if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                current += Duration::days(1);
                continue;
            }
            let daily_return: f64 = rng.gen_range(-MAX_DAILY_MOVE..MAX_DAILY_MOVE);
            level *= 1.0 + daily_return;
            if current >= start {
                rows.push(EurRate::new(current, currency, level));
            }
            current += Duration::days(1);
        }
        rows
    }
}

impl EurRateProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch_eur_series(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<EurRate>, FxError> {
        log::warn!("using SYNTHETIC rates for {start}..{end}; not real market data");
        let mut rows: Vec<EurRate> = Currency::non_eur()
            .into_iter()
            .flat_map(|c| self.walk(c, start, end))
            .collect();
        rows.sort_by(|a, b| (a.date, a.quote).cmp(&(b.date, b.quote)));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn weekdays_only_and_every_currency() {
        // Mon 2026-02-02 .. Sun 2026-02-08
        let rows = SyntheticProvider::new()
            .fetch_eur_series(d("2026-02-02"), d("2026-02-08"))
            .unwrap();
        assert_eq!(rows.len(), 5 * 3);
        assert!(rows
            .iter()
            .all(|r| !matches!(r.date.weekday(), Weekday::Sat | Weekday::Sun)));
        assert!(rows.iter().all(|r| r.rate > 0.0 && r.quote != Currency::Eur));
    }

    #[test]
    fn values_do_not_depend_on_requested_range() {
        let provider = SyntheticProvider::new();
        let wide = provider
            .fetch_eur_series(d("2026-01-01"), d("2026-02-06"))
            .unwrap();
        let narrow = provider
            .fetch_eur_series(d("2026-02-02"), d("2026-02-06"))
            .unwrap();
        let tail: Vec<_> = wide
            .into_iter()
            .filter(|r| r.date >= d("2026-02-02"))
            .collect();
        assert_eq!(tail, narrow);
    }

    #[test]
    fn range_before_anchor_is_empty() {
        let rows = SyntheticProvider::new()
            .fetch_eur_series(d("1999-01-01"), d("1999-12-31"))
            .unwrap();
        assert!(rows.is_empty());
    }
}
