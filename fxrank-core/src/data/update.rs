//! Cache update orchestrator: range → fetch → cross rates → merge → write.

use chrono::NaiveDate;
use serde::Serialize;

use super::cache::{merge, CacheStore};
use super::fetch_range::{compute_fetch_range, FetchPolicy, FetchRange};
use super::provider::EurRateProvider;
use crate::analytics::cross_rates::generate_cross_rates;
use crate::error::FxError;

/// What one update run did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateSummary {
    /// `None` when the cache was already current.
    pub range: Option<FetchRange>,
    pub fetched_rows: usize,
    pub cross_rows: usize,
    pub total_rows: usize,
    pub wrote: bool,
}

/// Bring the cache up to `today`.
///
/// When nothing is missing the provider is not called and the file is left
/// untouched. Any provider or validation failure aborts before writing.
pub fn update_cache(
    cache: &CacheStore,
    provider: &dyn EurRateProvider,
    today: NaiveDate,
    policy: &FetchPolicy,
) -> Result<UpdateSummary, FxError> {
    let existing = cache.read()?;

    let Some(range) = compute_fetch_range(&existing, today, policy) else {
        log::info!(
            "cache {} is current through {today}",
            cache.path().display()
        );
        return Ok(UpdateSummary {
            range: None,
            fetched_rows: 0,
            cross_rows: 0,
            total_rows: existing.len(),
            wrote: false,
        });
    };

    log::info!(
        "fetching {range} ({} days) from {}",
        range.days(),
        provider.name()
    );
    let eur_series = provider.fetch_eur_series(range.start, range.end)?;
    let cross = generate_cross_rates(&eur_series)?;
    let merged = merge(&existing, &cross);
    cache.write(&merged)?;

    Ok(UpdateSummary {
        range: Some(range),
        fetched_rows: eur_series.len(),
        cross_rows: cross.len(),
        total_rows: merged.len(),
        wrote: true,
    })
}
