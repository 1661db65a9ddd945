//! Rate persistence and acquisition: the Parquet cache, fetch-range
//! planning, providers and the update pipeline.

pub mod cache;
pub mod fetch_range;
pub mod frankfurter;
pub mod provider;
pub mod schema;
pub mod synthetic;
pub mod update;

pub use cache::{merge, normalize, CacheMeta, CacheStatus, CacheStore};
pub use fetch_range::{compute_fetch_range, FetchPolicy, FetchRange, MAX_LOOKBACK_DAYS};
pub use frankfurter::{
    parse_pair_series, FrankfurterConfig, FrankfurterProvider, MAX_RETRIES,
};
pub use provider::EurRateProvider;
pub use schema::RateSchema;
pub use synthetic::SyntheticProvider;
pub use update::{update_cache, UpdateSummary};
