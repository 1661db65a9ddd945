//! Pure computations: cross rates, rolling metrics and rankings.

pub mod cross_rates;
pub mod metrics;
pub mod ranker;

pub use cross_rates::generate_cross_rates;
pub use metrics::MetricConfig;
pub use ranker::{build_rankings, rank_targets, RankingView, Rankings, Scores};
