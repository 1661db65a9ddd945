//! Per-target scoring and the four ranking views.
//!
//! For a base currency every other supported currency is a target. Each
//! target's `base/target` series feeds the metrics library; the metrics are
//! blended into value, trend, risk and overall scores. A `None` anywhere in a
//! composite's inputs makes the composite `None` too: no partial scores.
//!
//! The weights and clamp bounds below are fixed constants of the scoring
//! model, not tunables.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::metrics::{
    momentum, percentile_rank, trailing_sma, volatility, z_score, MetricConfig,
};
use crate::data::cache::pair_series;
use crate::domain::{Currency, Pair, RateObservation};

// ─── Scoring constants ──────────────────────────────────────────────

pub const VALUE_PERCENTILE_WEIGHT: f64 = 0.6;
pub const VALUE_ZSCORE_WEIGHT: f64 = 0.4;
/// z = -3 maps to a full z component.
pub const ZSCORE_SCALE: f64 = 3.0;

pub const TREND_MOMENTUM_WEIGHT: f64 = 0.6;
pub const TREND_SMA_WEIGHT: f64 = 0.4;
/// Momentum of -20%..+20% maps to 0..1.
pub const MOMENTUM_FLOOR: f64 = -0.20;
pub const MOMENTUM_SPAN: f64 = 0.40;
/// Distance from SMA of -10%..+10% maps to 0..1.
pub const SMA_DIFF_FLOOR: f64 = -0.10;
pub const SMA_DIFF_SPAN: f64 = 0.20;

/// Annualized volatility of 5%..25% maps to 0..1.
pub const VOL_FLOOR: f64 = 0.05;
pub const VOL_SPAN: f64 = 0.20;

pub const OVERALL_VALUE_WEIGHT: f64 = 0.55;
pub const OVERALL_TREND_WEIGHT: f64 = 0.25;
pub const OVERALL_SAFETY_WEIGHT: f64 = 0.20;

/// Scores for one `(base, target)` pair. Recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub target: Currency,
    pub as_of: NaiveDate,
    pub rate_today: f64,

    pub percentile_5y: Option<f64>,
    pub zscore_5y: Option<f64>,
    pub value_score: Option<f64>,

    pub mom_60d: Option<f64>,
    pub sma_200_diff: Option<f64>,
    pub trend_score: Option<f64>,

    pub vol_90d: Option<f64>,
    pub risk_score: Option<f64>,

    pub overall_score: Option<f64>,
}

impl Scores {
    /// The score a view sorts by.
    pub fn score(&self, view: RankingView) -> Option<f64> {
        match view {
            RankingView::Value => self.value_score,
            RankingView::Trend => self.trend_score,
            RankingView::Risk => self.risk_score,
            RankingView::Overall => self.overall_score,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.overall_score.is_some()
    }
}

/// A named ordering of the scores for one base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingView {
    Value,
    Trend,
    Risk,
    Overall,
}

impl RankingView {
    pub const ALL: [RankingView; 4] = [
        RankingView::Value,
        RankingView::Trend,
        RankingView::Risk,
        RankingView::Overall,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RankingView::Value => "value",
            RankingView::Trend => "trend",
            RankingView::Risk => "risk",
            RankingView::Overall => "overall",
        }
    }

    /// Risk ranks lowest first; every other view highest first.
    pub fn ascending(self) -> bool {
        matches!(self, RankingView::Risk)
    }
}

impl fmt::Display for RankingView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four views over one set of scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rankings {
    pub value: Vec<Scores>,
    pub trend: Vec<Scores>,
    pub risk: Vec<Scores>,
    pub overall: Vec<Scores>,
}

impl Rankings {
    pub fn view(&self, view: RankingView) -> &[Scores] {
        match view {
            RankingView::Value => &self.value,
            RankingView::Trend => &self.trend,
            RankingView::Risk => &self.risk,
            RankingView::Overall => &self.overall,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.overall.is_empty()
    }
}

// ─── Composite scores ───────────────────────────────────────────────

pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    x.max(lo).min(hi)
}

/// Cheap vs history scores high.
pub fn value_score(percentile: Option<f64>, z: Option<f64>) -> Option<f64> {
    let cheapness = 1.0 - percentile?;
    let z_component = clamp(-z? / ZSCORE_SCALE, 0.0, 1.0);
    Some(VALUE_PERCENTILE_WEIGHT * cheapness + VALUE_ZSCORE_WEIGHT * z_component)
}

/// Rising and above its SMA scores high.
pub fn trend_score(momentum: Option<f64>, sma_diff: Option<f64>) -> Option<f64> {
    let mom_component = clamp((momentum? - MOMENTUM_FLOOR) / MOMENTUM_SPAN, 0.0, 1.0);
    let sma_component = clamp((sma_diff? - SMA_DIFF_FLOOR) / SMA_DIFF_SPAN, 0.0, 1.0);
    Some(TREND_MOMENTUM_WEIGHT * mom_component + TREND_SMA_WEIGHT * sma_component)
}

/// Higher volatility, higher risk.
pub fn risk_score(vol: Option<f64>) -> Option<f64> {
    Some(clamp((vol? - VOL_FLOOR) / VOL_SPAN, 0.0, 1.0))
}

pub fn overall_score(value: Option<f64>, trend: Option<f64>, risk: Option<f64>) -> Option<f64> {
    Some(
        OVERALL_VALUE_WEIGHT * value?
            + OVERALL_TREND_WEIGHT * trend?
            + OVERALL_SAFETY_WEIGHT * (1.0 - risk?),
    )
}

// ─── Ranking ────────────────────────────────────────────────────────

/// Score one target from its date-ascending `(date, rate)` series.
///
/// Returns `None` for an empty series.
pub fn score_target(
    target: Currency,
    series: &[(NaiveDate, f64)],
    config: &MetricConfig,
) -> Option<Scores> {
    let &(as_of, rate_today) = series.last()?;
    let rates: Vec<f64> = series.iter().map(|(_, r)| *r).collect();

    let percentile_5y = percentile_rank(&rates, rate_today);
    let zscore_5y = z_score(&rates, rate_today);
    let value = value_score(percentile_5y, zscore_5y);

    let mom_60d = momentum(&rates, config.mom_window);
    let sma_200_diff = trailing_sma(&rates, config.sma_window)
        .filter(|sma| *sma != 0.0)
        .map(|sma| rate_today / sma - 1.0);
    let trend = trend_score(mom_60d, sma_200_diff);

    let vol_90d = volatility(&rates, config.vol_window, config.annualization_factor);
    let risk = risk_score(vol_90d);

    Some(Scores {
        target,
        as_of,
        rate_today,
        percentile_5y,
        zscore_5y,
        value_score: value,
        mom_60d,
        sma_200_diff,
        trend_score: trend,
        vol_90d,
        risk_score: risk,
        overall_score: overall_score(value, trend, risk),
    })
}

/// Scores for every target of `base` that has at least one observation,
/// in `Currency::ALL` order.
pub fn rank_targets(
    observations: &[RateObservation],
    base: Currency,
    config: &MetricConfig,
) -> Vec<Scores> {
    let mut out = Vec::new();
    for target in Currency::targets_for(base) {
        let pair = Pair { base, quote: target };
        let series = pair_series(observations, pair);
        match score_target(target, &series, config) {
            Some(scores) => {
                if !scores.is_complete() {
                    log::info!(
                        "{pair}: incomplete scores from {} observations",
                        series.len()
                    );
                }
                out.push(scores);
            }
            None => log::debug!("{pair}: no observations, skipping target"),
        }
    }
    out
}

/// Order `scores` for one view.
///
/// Stable sort on the view's score (missing scores last), ties broken by
/// ascending target code, so identical inputs always give identical order.
pub fn sort_view(scores: &[Scores], view: RankingView) -> Vec<Scores> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| {
        compare_scores(a.score(view), b.score(view), view.ascending())
            .then_with(|| a.target.cmp(&b.target))
    });
    sorted
}

pub fn build_rankings(scores: &[Scores]) -> Rankings {
    Rankings {
        value: sort_view(scores, RankingView::Value),
        trend: sort_view(scores, RankingView::Trend),
        risk: sort_view(scores, RankingView::Risk),
        overall: sort_view(scores, RankingView::Overall),
    }
}

fn compare_scores(a: Option<f64>, b: Option<f64>, ascending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
