//! Decide which dates the cache is still missing.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::cache::max_date;
use crate::domain::RateObservation;

/// Longest lookback accepted from settings (100 years).
pub const MAX_LOOKBACK_DAYS: i64 = 36_525;

/// How far back an empty cache reaches, and an optional hard floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchPolicy {
    pub lookback_days: i64,
    pub min_start_date: Option<NaiveDate>,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            // ~5 years
            lookback_days: 1825,
            min_start_date: None,
        }
    }
}

/// Inclusive date range to request from a provider. Never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchRange {
    /// Calendar days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for FetchRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// The range still needed to bring the cache up to `today`.
///
/// Returns `None` when the cache is already current. A lookback reaching
/// past the earliest representable date starts there instead.
pub fn compute_fetch_range(
    observations: &[RateObservation],
    today: NaiveDate,
    policy: &FetchPolicy,
) -> Option<FetchRange> {
    let mut start = match max_date(observations) {
        Some(latest) => latest.succ_opt()?,
        None => {
            let back = Days::new(u64::try_from(policy.lookback_days).unwrap_or(0));
            today.checked_sub_days(back).unwrap_or(NaiveDate::MIN)
        }
    };
    if let Some(floor) = policy.min_start_date {
        start = start.max(floor);
    }
    (start <= today).then_some(FetchRange { start, end: today })
}
