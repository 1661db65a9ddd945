//! Parquet-backed rate cache.
//!
//! Layout: a single Parquet file (default `data/cache.parquet`) with columns
//! `date, base, quote, rate`, plus a `{file}.meta.json` sidecar.
//!
//! Features:
//! - Missing file reads as an empty store
//! - Schema check and type normalization on load (dates truncated to the day,
//!   codes upper-cased, rates coerced to f64)
//! - Right-biased, idempotent merge keyed on `(date, base, quote)`
//! - Atomic writes (write to .tmp, rename into place)
//!
//! There is no locking: concurrent writers race and the last rename wins.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::schema::RateSchema;
use crate::domain::{Currency, Pair, RateObservation};
use crate::error::{FxError, ValidationError};

/// Metadata sidecar written next to the cache file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheMeta {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub row_count: usize,
    pub pair_count: usize,
    pub data_hash: String,
    pub written_at: NaiveDateTime,
}

/// Summary of what is on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatus {
    pub path: PathBuf,
    pub exists: bool,
    pub size_bytes: u64,
    pub meta: Option<CacheMeta>,
}

/// The persisted rate store.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location: `data/cache.parquet`.
    pub fn default_path() -> PathBuf {
        Path::new("data").join("cache.parquet")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn meta_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".meta.json");
        PathBuf::from(name)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Load and normalize the store. A missing file is an empty store.
    pub fn read(&self) -> Result<Vec<RateObservation>, FxError> {
        if !self.path.exists() {
            log::debug!("no cache at {}, starting empty", self.path.display());
            return Ok(Vec::new());
        }
        let df = read_parquet(&self.path)?;
        let observations = frame_to_observations(&df)?;
        Ok(normalize(&observations))
    }

    /// Normalize and persist `observations`, replacing the file atomically.
    pub fn write(&self, observations: &[RateObservation]) -> Result<CacheMeta, FxError> {
        let normalized = normalize(observations);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| FxError::Cache(format!("failed to create dir: {e}")))?;
        }

        let mut df = observations_to_frame(&normalized)?;
        let tmp_path = self.tmp_path();
        write_parquet(&mut df, &tmp_path)?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            FxError::Cache(format!("atomic rename failed: {e}"))
        })?;

        let meta = CacheMeta {
            start_date: normalized.first().map(|o| o.date),
            end_date: normalized.last().map(|o| o.date),
            row_count: normalized.len(),
            pair_count: normalized.iter().map(|o| o.pair()).collect::<HashSet<_>>().len(),
            data_hash: blake3::hash(
                &serde_json::to_vec(&normalized)
                    .map_err(|e| FxError::Cache(format!("hash serialization: {e}")))?,
            )
            .to_hex()
            .to_string(),
            written_at: chrono::Local::now().naive_local(),
        };
        let meta_json = serde_json::to_string_pretty(&meta)
            .map_err(|e| FxError::Cache(format!("meta serialization: {e}")))?;
        fs::write(self.meta_path(), meta_json)
            .map_err(|e| FxError::Cache(format!("meta write: {e}")))?;

        log::info!(
            "wrote {} rows to {}",
            normalized.len(),
            self.path.display()
        );
        Ok(meta)
    }

    /// Metadata sidecar, if present and readable.
    pub fn get_meta(&self) -> Option<CacheMeta> {
        let content = fs::read_to_string(self.meta_path()).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn status(&self) -> CacheStatus {
        let size_bytes = fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);
        CacheStatus {
            path: self.path.clone(),
            exists: self.path.exists(),
            size_bytes,
            meta: self.get_meta(),
        }
    }
}

// ─── Pure store operations ──────────────────────────────────────────

/// Deduplicate by `(date, base, quote)` keeping the last occurrence, then
/// stable-sort by that key.
pub fn normalize(observations: &[RateObservation]) -> Vec<RateObservation> {
    let mut seen = HashSet::with_capacity(observations.len());
    let mut out: Vec<RateObservation> = observations
        .iter()
        .rev()
        .filter(|o| seen.insert(o.key()))
        .copied()
        .collect();
    out.reverse();
    out.sort_by_key(|o| o.key());
    out
}

/// Merge `incoming` into `existing`. Incoming wins on key collisions.
///
/// `merge(merge(a, b), b) == merge(a, b)`; commutative only when keys don't
/// collide.
pub fn merge(existing: &[RateObservation], incoming: &[RateObservation]) -> Vec<RateObservation> {
    let mut all = Vec::with_capacity(existing.len() + incoming.len());
    all.extend_from_slice(existing);
    all.extend_from_slice(incoming);
    normalize(&all)
}

/// Latest date present, if any.
pub fn max_date(observations: &[RateObservation]) -> Option<NaiveDate> {
    observations.iter().map(|o| o.date).max()
}

/// Date-ascending `(date, rate)` series for one pair.
pub fn pair_series(observations: &[RateObservation], pair: Pair) -> Vec<(NaiveDate, f64)> {
    let mut series: Vec<(NaiveDate, f64)> = observations
        .iter()
        .filter(|o| o.pair() == pair)
        .map(|o| (o.date, o.rate))
        .collect();
    series.sort_by_key(|(date, _)| *date);
    series
}

// ─── Frame conversion ───────────────────────────────────────────────

fn epoch() -> NaiveDate {
    NaiveDate::default()
}

/// Build a frame with the canonical schema. Extra fields never make it in.
pub fn observations_to_frame(observations: &[RateObservation]) -> Result<DataFrame, FxError> {
    let dates: Vec<i32> = observations
        .iter()
        .map(|o| (o.date - epoch()).num_days() as i32)
        .collect();
    let bases: Vec<&str> = observations.iter().map(|o| o.base.code()).collect();
    let quotes: Vec<&str> = observations.iter().map(|o| o.quote.code()).collect();
    let rates: Vec<f64> = observations.iter().map(|o| o.rate).collect();

    DataFrame::new(vec![
        Column::new("date".into(), dates)
            .cast(&DataType::Date)
            .map_err(|e| FxError::Parquet(format!("date cast: {e}")))?,
        Column::new("base".into(), bases),
        Column::new("quote".into(), quotes),
        Column::new("rate".into(), rates),
    ])
    .map_err(|e| FxError::Parquet(format!("dataframe creation: {e}")))
}

/// Validate the schema of `df` and normalize every row into an observation.
///
/// Fails on the first bad value, naming its row.
pub fn frame_to_observations(df: &DataFrame) -> Result<Vec<RateObservation>, FxError> {
    RateSchema::validate(df)?;

    let dates = date_column(df)?;
    let bases = currency_column(df, "base")?;
    let quotes = currency_column(df, "quote")?;
    let rates = rate_column(df)?;

    let mut out = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        out.push(RateObservation::new(dates[i], bases[i], quotes[i], rates[i])?);
    }
    Ok(out)
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, FxError> {
    df.column(name)
        .map_err(|_| ValidationError::MissingColumn {
            column: name.to_string(),
        }
        .into())
}

fn date_column(df: &DataFrame) -> Result<Vec<NaiveDate>, FxError> {
    let col = column(df, "date")?;
    let map_err = |e: PolarsError| FxError::Parquet(format!("date column: {e}"));

    if let DataType::String = col.dtype() {
        let ca = col.str().map_err(map_err)?;
        return (0..ca.len())
            .map(|row| -> Result<NaiveDate, FxError> {
                let raw = ca.get(row).ok_or_else(|| ValidationError::InvalidDate {
                    row,
                    value: "null".into(),
                })?;
                parse_day(raw).ok_or_else(|| {
                    ValidationError::InvalidDate {
                        row,
                        value: raw.to_string(),
                    }
                    .into()
                })
            })
            .collect();
    }

    // Date passes through; Datetime is truncated to the calendar day.
    let as_date = col.cast(&DataType::Date).map_err(|_| ValidationError::InvalidDate {
        row: 0,
        value: format!("column of type {}", col.dtype()),
    })?;
    let ca = as_date.date().map_err(map_err)?;
    (0..ca.len())
        .map(|row| -> Result<NaiveDate, FxError> {
            ca.get(row)
                .map(|days| epoch() + chrono::Duration::days(i64::from(days)))
                .ok_or_else(|| {
                    ValidationError::InvalidDate {
                        row,
                        value: "null".into(),
                    }
                    .into()
                })
        })
        .collect()
}

/// `YYYY-MM-DD`, optionally followed by a time part which is dropped.
fn parse_day(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn currency_column(df: &DataFrame, name: &str) -> Result<Vec<Currency>, FxError> {
    let col = column(df, name)?;
    let as_str = col
        .cast(&DataType::String)
        .map_err(|e| FxError::Parquet(format!("{name} column: {e}")))?;
    let ca = as_str
        .str()
        .map_err(|e| FxError::Parquet(format!("{name} column: {e}")))?;
    (0..ca.len())
        .map(|row| -> Result<Currency, FxError> {
            let code = ca.get(row).unwrap_or("null");
            Currency::parse(code).map_err(|_| {
                ValidationError::InvalidCurrency {
                    row,
                    column: name.to_string(),
                    code: code.to_string(),
                }
                .into()
            })
        })
        .collect()
}

fn rate_column(df: &DataFrame) -> Result<Vec<f64>, FxError> {
    let col = column(df, "rate")?;

    if let DataType::String = col.dtype() {
        let ca = col
            .str()
            .map_err(|e| FxError::Parquet(format!("rate column: {e}")))?;
        return (0..ca.len())
            .map(|row| -> Result<f64, FxError> {
                let raw = ca.get(row).unwrap_or("null");
                raw.trim().parse::<f64>().map_err(|_| {
                    ValidationError::InvalidRate {
                        row,
                        value: raw.to_string(),
                    }
                    .into()
                })
            })
            .collect();
    }

    let as_f64 = col
        .cast(&DataType::Float64)
        .map_err(|_| ValidationError::InvalidRate {
            row: 0,
            value: format!("column of type {}", col.dtype()),
        })?;
    let ca = as_f64
        .f64()
        .map_err(|e| FxError::Parquet(format!("rate column: {e}")))?;
    (0..ca.len())
        .map(|row| -> Result<f64, FxError> {
            ca.get(row).ok_or_else(|| {
                ValidationError::InvalidRate {
                    row,
                    value: "null".into(),
                }
                .into()
            })
        })
        .collect()
}

// ─── Parquet I/O helpers ────────────────────────────────────────────

fn write_parquet(df: &mut DataFrame, path: &Path) -> Result<(), FxError> {
    let file =
        fs::File::create(path).map_err(|e| FxError::Parquet(format!("create file: {e}")))?;
    ParquetWriter::new(file)
        .finish(df)
        .map_err(|e| FxError::Parquet(format!("write parquet: {e}")))?;
    Ok(())
}

fn read_parquet(path: &Path) -> Result<DataFrame, FxError> {
    let file = fs::File::open(path).map_err(|e| FxError::Parquet(format!("open: {e}")))?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| FxError::Parquet(format!("read: {e}")))
}
