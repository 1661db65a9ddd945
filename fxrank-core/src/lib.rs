//! FxRank Core: currency domain, cross-rate generation, rolling metrics,
//! rankings and the Parquet rate cache.
//!
//! This crate holds everything that decides *what* the numbers are:
//! - Domain types (currencies, directed pairs, rate observations)
//! - Cross-rate expansion of a EUR-quoted feed into every directed pair
//! - Metrics library and the four ranking views
//! - Cache store with right-biased merge and schema normalization
//! - Fetch-range planning, providers and the cache update pipeline
//!
//! Everything except the providers and cache I/O is pure and synchronous.

pub mod analytics;
pub mod data;
pub mod domain;
pub mod error;

pub use error::{FxError, ProviderError, ValidationError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed across threads by callers are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Currency>();
        require_sync::<domain::Currency>();
        require_send::<domain::RateObservation>();
        require_sync::<domain::RateObservation>();
        require_send::<analytics::Scores>();
        require_sync::<analytics::Scores>();
        require_send::<analytics::Rankings>();
        require_sync::<analytics::Rankings>();
        require_send::<data::CacheStore>();
        require_sync::<data::CacheStore>();
        require_send::<data::FrankfurterProvider>();
        require_sync::<data::FrankfurterProvider>();
        require_send::<FxError>();
        require_sync::<FxError>();
    }

    /// Providers are used as trait objects by the update pipeline.
    #[test]
    fn provider_trait_is_object_safe() {
        let provider: Box<dyn data::EurRateProvider> = Box::new(data::SyntheticProvider::new());
        assert_eq!(provider.name(), "synthetic");
    }
}
