//! Settings file: paths, fetch policy, metric windows and provider options.
//!
//! Every section and field is optional; a missing file means all defaults.
//!
//! ```toml
//! [paths]
//! cache_file = "data/cache.parquet"
//! reports_dir = "reports"
//!
//! [fetch]
//! lookback_days = 1825
//! min_start_date = "2020-01-01"
//!
//! [metrics]
//! vol_window = 90
//! mom_window = 60
//! sma_window = 200
//! annualization_factor = 252
//!
//! [provider]
//! base_url = "https://api.frankfurter.dev/v1"
//! timeout_secs = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use fxrank_core::analytics::MetricConfig;
use fxrank_core::data::{
    CacheStore, FetchPolicy, FrankfurterConfig, MAX_LOOKBACK_DAYS, MAX_RETRIES,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub cache_file: PathBuf,
    pub reports_dir: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            cache_file: CacheStore::default_path(),
            reports_dir: PathBuf::from("reports"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: PathSettings,
    pub fetch: FetchPolicy,
    pub metrics: MetricConfig,
    pub provider: FrankfurterConfig,
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Settings from `path` if given, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                log::debug!("loading settings from {}", p.display());
                Self::from_file(p)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.metrics;
        if m.vol_window == 0 || m.mom_window == 0 || m.sma_window == 0 {
            return Err(ConfigError::Invalid(
                "metric windows must be at least 1".into(),
            ));
        }
        if m.annualization_factor == 0 {
            return Err(ConfigError::Invalid(
                "annualization_factor must be positive".into(),
            ));
        }
        if self.fetch.lookback_days <= 0 || self.fetch.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(ConfigError::Invalid(format!(
                "lookback_days must be between 1 and {MAX_LOOKBACK_DAYS}, got {}",
                self.fetch.lookback_days
            )));
        }
        if self.provider.max_retries > MAX_RETRIES {
            return Err(ConfigError::Invalid(format!(
                "provider max_retries must be at most {MAX_RETRIES}, got {}",
                self.provider.max_retries
            )));
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("provider base_url is empty".into()));
        }
        Ok(())
    }

    pub fn cache(&self) -> CacheStore {
        CacheStore::new(&self.paths.cache_file)
    }
}
