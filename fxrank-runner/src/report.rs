//! Ranking report assembly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use fxrank_core::analytics::{build_rankings, rank_targets, MetricConfig, Rankings, Scores};
use fxrank_core::domain::{Currency, RateObservation};

/// Scores and the four views for one base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingReport {
    pub base: Currency,
    /// Latest `as_of` across targets; `None` when there is no data.
    pub as_of: Option<NaiveDate>,
    pub scores: Vec<Scores>,
    pub rankings: Rankings,
}

impl RankingReport {
    pub fn build(observations: &[RateObservation], base: Currency, config: &MetricConfig) -> Self {
        let scores = rank_targets(observations, base, config);
        let rankings = build_rankings(&scores);
        let as_of = scores.iter().map(|s| s.as_of).max();
        log::info!(
            "ranked {} targets for base {base} (as of {})",
            scores.len(),
            as_of.map_or_else(|| "n/a".to_string(), |d| d.to_string())
        );
        Self {
            base,
            as_of,
            scores,
            rankings,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn best_overall(&self) -> Option<&Scores> {
        self.rankings.overall.first()
    }

    pub fn best_value(&self) -> Option<&Scores> {
        self.rankings.value.first()
    }

    pub fn lowest_risk(&self) -> Option<&Scores> {
        self.rankings.risk.first()
    }
}
