//! Structured error types for the core.
//!
//! Three families surface to callers: validation failures (bad schema, bad
//! rate, bad currency), missing EUR-quoted data for a date during cross-rate
//! generation, and provider failures raised by the fetch adaptor. Missing
//! history for a metric is *not* an error; it shows up as `None` in scores.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::Currency;

/// Top-level error for core operations.
#[derive(Debug, Error)]
pub enum FxError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("missing EUR-quoted rate for {currency} on {date}")]
    MissingCurrencyData { date: NaiveDate, currency: Currency },

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("cache error: {0}")]
    Cache(String),

    #[error("parquet I/O error: {0}")]
    Parquet(String),
}

/// Malformed input. Always fails fast; rows are never silently dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required column '{column}' (required: date, base, quote, rate)")]
    MissingColumn { column: String },

    #[error("non-numeric rate {value:?} at row {row}")]
    InvalidRate { row: usize, value: String },

    #[error("unparseable date {value:?} at row {row}")]
    InvalidDate { row: usize, value: String },

    #[error("base and quote must differ, got {currency}/{currency}")]
    SameCurrency { currency: Currency },

    #[error("unsupported currency '{code}' (supported: PLN, USD, EUR, GBP)")]
    UnsupportedCurrency { code: String },

    #[error("unsupported currency {code:?} in column '{column}' at row {row}")]
    InvalidCurrency {
        row: usize,
        column: String,
        code: String,
    },

    #[error("rate for {pair} on {date} must be positive and finite, got {rate}")]
    NonPositiveRate {
        date: NaiveDate,
        pair: String,
        rate: f64,
    },
}

/// Failures raised by a rate provider. Propagated unchanged through the core.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("provider returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("unexpected base in response: expected {expected}, got {actual}")]
    UnexpectedBase { expected: String, actual: String },

    #[error("symbols must not be empty")]
    EmptySymbols,

    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),
}
