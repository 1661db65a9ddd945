//! Frankfurter (ECB reference rates) provider.
//!
//! Fetches daily time series from the `/{start}..{end}` endpoint. Handles
//! retries with exponential backoff on connection failures, 429 and 5xx, and
//! validates the payload shape before anything reaches the cache.
//!
//! Response shape:
//! `{"base": "EUR", "start_date": ..., "end_date": ..., "rates": {"2026-02-02": {"USD": 1.1, ...}}}`

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::time::Duration;

use super::provider::EurRateProvider;
use crate::domain::{Currency, EurRate, RateObservation};
use crate::error::{FxError, ProviderError};

/// Upper bound on `max_retries` accepted from settings.
pub const MAX_RETRIES: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrankfurterConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
}

impl Default for FrankfurterConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.frankfurter.dev/v1".into(),
            timeout_secs: 10,
            max_retries: 3,
            retry_base_delay_ms: 500,
        }
    }
}

pub struct FrankfurterProvider {
    client: reqwest::blocking::Client,
    config: FrankfurterConfig,
}

impl FrankfurterProvider {
    pub fn new(config: FrankfurterConfig) -> Result<Self, FxError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("fxrank/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::ClientSetup(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Direct series for an arbitrary base, in cache orientation. See
    /// [`parse_pair_series`].
    pub fn fetch_pair_series(
        &self,
        base: Currency,
        symbols: &[Currency],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RateObservation>, FxError> {
        let url = timeseries_url(&self.config.base_url, base, symbols, start, end)?;
        let payload = self.get_json(&url)?;
        parse_pair_series(&payload, base)
    }

    /// GET with retry. Returns the parsed JSON body of the first 200 response.
    fn get_json(&self, url: &str) -> Result<Value, FxError> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(self.config.retry_base_delay_ms, attempt);
                log::debug!("retrying {url} in {delay:?} (attempt {attempt})");
                std::thread::sleep(delay);
            }

            match self.client.get(url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(ProviderError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if !status.is_success() {
                        let body = resp.text().unwrap_or_default();
                        let err = ProviderError::HttpStatus {
                            status: status.as_u16(),
                            body,
                        };
                        if status.is_server_error() {
                            last_error = Some(err);
                            continue;
                        }
                        return Err(err.into());
                    }

                    return resp.json::<Value>().map_err(|e| {
                        ProviderError::ResponseFormatChanged(format!("invalid JSON body: {e}"))
                            .into()
                    });
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        log::warn!("request to {url} failed: {e}");
                        last_error = Some(ProviderError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(ProviderError::NetworkUnreachable(e.to_string()).into());
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| ProviderError::NetworkUnreachable("max retries exceeded".into()))
            .into())
    }
}

impl EurRateProvider for FrankfurterProvider {
    fn name(&self) -> &str {
        "frankfurter"
    }

    fn fetch_eur_series(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<EurRate>, FxError> {
        let url = timeseries_url(
            &self.config.base_url,
            Currency::Eur,
            &Currency::non_eur(),
            start,
            end,
        )?;
        log::info!("fetching EUR series {start}..{end}");
        let payload = self.get_json(&url)?;
        let rows = parse_timeseries(&payload, Currency::Eur)?;
        log::info!("received {} EUR-quoted rows", rows.len());
        Ok(rows)
    }
}

/// Delay before retry number `attempt` (1-based): `base_ms * 2^(attempt - 1)`,
/// saturating instead of overflowing.
pub fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    Duration::from_millis(base_ms).saturating_mul(factor)
}

/// `{base_url}/{start}..{end}?base=XXX&symbols=A,B` with symbols sorted and
/// de-duplicated.
pub fn timeseries_url(
    base_url: &str,
    base: Currency,
    symbols: &[Currency],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<String, ProviderError> {
    let symbols: BTreeSet<&str> = symbols.iter().map(|c| c.code()).collect();
    if symbols.is_empty() {
        return Err(ProviderError::EmptySymbols);
    }
    let joined = symbols.into_iter().collect::<Vec<_>>().join(",");
    Ok(format!(
        "{}/{start}..{end}?base={base}&symbols={joined}",
        base_url.trim_end_matches('/')
    ))
}

/// Flatten a timeseries payload into rows sorted by `(date, quote)`.
///
/// The `quote` field of each row holds the symbol and `rate` is symbol units
/// per 1 `expected_base`. Non-object day entries are skipped and unknown
/// currency codes ignored.
pub fn parse_timeseries(payload: &Value, expected_base: Currency) -> Result<Vec<EurRate>, ProviderError> {
    let actual = payload.get("base").and_then(Value::as_str).unwrap_or("");
    if actual != expected_base.code() {
        return Err(ProviderError::UnexpectedBase {
            expected: expected_base.code().to_string(),
            actual: actual.to_string(),
        });
    }

    let rates = payload
        .get("rates")
        .and_then(Value::as_object)
        .ok_or_else(|| ProviderError::ResponseFormatChanged("missing or invalid 'rates'".into()))?;

    let mut rows = Vec::new();
    for (day, day_rates) in rates {
        let Some(day_rates) = day_rates.as_object() else {
            continue;
        };
        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map_err(|_| ProviderError::ResponseFormatChanged(format!("invalid date key '{day}'")))?;

        for (code, value) in day_rates {
            let Ok(quote) = Currency::parse(code) else {
                log::debug!("ignoring unsupported currency {code} on {day}");
                continue;
            };
            let rate = value.as_f64().ok_or_else(|| {
                ProviderError::ResponseFormatChanged(format!(
                    "non-numeric rate {value} for {code} on {day}"
                ))
            })?;
            rows.push(EurRate::new(date, quote, rate));
        }
    }

    rows.sort_by(|a, b| (a.date, a.quote).cmp(&(b.date, b.quote)));
    Ok(rows)
}

/// Turn a timeseries payload for `base` into observations.
///
/// The API quotes "1 `base` = r `symbol`", which in cache orientation is
/// `RateObservation { base: symbol, quote: base, rate: r }`: symbol units per
/// 1 `base`. Rows quoting `base` itself are dropped. Sorted by key.
pub fn parse_pair_series(payload: &Value, base: Currency) -> Result<Vec<RateObservation>, FxError> {
    let quotes = parse_timeseries(payload, base)?;

    let mut out = Vec::with_capacity(quotes.len());
    for q in quotes.into_iter().filter(|q| q.quote != base) {
        out.push(RateObservation::new(q.date, q.quote, base, q.rate)?);
    }
    out.sort_by_key(|o| o.key());
    Ok(out)
}
