//! Fetch and report entry points used by the CLI.
//!
//! - `run_fetch()`: brings the cache up to date from a provider.
//! - `run_report()`: reads the cache and ranks every target for one base.
//! - `cache_status()`: what is on disk, without loading it.

use chrono::NaiveDate;
use thiserror::Error;

use fxrank_core::data::{update_cache, CacheStatus, EurRateProvider, UpdateSummary};
use fxrank_core::domain::Currency;
use fxrank_core::FxError;

use crate::config::{ConfigError, Settings};
use crate::report::RankingReport;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Core(#[from] FxError),
}

/// Fetch whatever the cache is missing up to `today` and merge it in.
pub fn run_fetch(
    settings: &Settings,
    provider: &dyn EurRateProvider,
    today: NaiveDate,
) -> Result<UpdateSummary, RunError> {
    settings.validate()?;
    let cache = settings.cache();
    let summary = update_cache(&cache, provider, today, &settings.fetch)?;
    log::info!(
        "fetch complete: {} rows in {}",
        summary.total_rows,
        cache.path().display()
    );
    Ok(summary)
}

/// Rank every target of `base` from the cached observations.
pub fn run_report(settings: &Settings, base: Currency) -> Result<RankingReport, RunError> {
    settings.validate()?;
    let observations = settings.cache().read()?;
    Ok(RankingReport::build(&observations, base, &settings.metrics))
}

pub fn cache_status(settings: &Settings) -> CacheStatus {
    settings.cache().status()
}
