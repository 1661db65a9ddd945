//! Rolling statistics over chronologically ordered rate series.
//!
//! Every metric is a pure function: slice in, `Option<f64>` out. `None` is the
//! "no value" marker: empty or too-short history, a zero reference value, or a
//! non-positive price ratio. Non-finite entries are dropped before computing
//! unless a function says otherwise.
//!
//! One deliberate asymmetry: [`z_score`] returns `Some(0.0)` (not `None`) when
//! the history has zero dispersion.

use serde::{Deserialize, Serialize};

/// Window sizes and annualization for the ranking metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricConfig {
    /// Trailing log returns used for volatility.
    pub vol_window: usize,
    /// Momentum lookback in observations.
    pub mom_window: usize,
    /// Simple moving average window.
    pub sma_window: usize,
    /// Observations per year (trading days).
    pub annualization_factor: u32,
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            vol_window: 90,
            mom_window: 60,
            sma_window: 200,
            annualization_factor: 252,
        }
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

fn finite(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Arithmetic mean of the finite entries.
pub fn mean(values: &[f64]) -> Option<f64> {
    let v = finite(values);
    if v.is_empty() {
        return None;
    }
    Some(v.iter().sum::<f64>() / v.len() as f64)
}

/// Population standard deviation (ddof = 0) of the finite entries.
pub fn population_std(values: &[f64]) -> Option<f64> {
    let v = finite(values);
    if v.is_empty() {
        return None;
    }
    let n = v.len() as f64;
    let mu = v.iter().sum::<f64>() / n;
    let var = v.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / n;
    Some(var.sqrt())
}

// ─── Value metrics ──────────────────────────────────────────────────

/// Fraction of `history` at or below `value`, in `[0, 1]`.
pub fn percentile_rank(history: &[f64], value: f64) -> Option<f64> {
    let h = finite(history);
    if h.is_empty() {
        return None;
    }
    let at_or_below = h.iter().filter(|&&x| x <= value).count();
    Some(at_or_below as f64 / h.len() as f64)
}

/// `(value - mean) / population_std` over `history`.
///
/// Zero dispersion yields `Some(0.0)` for any `value`.
pub fn z_score(history: &[f64], value: f64) -> Option<f64> {
    let mu = mean(history)?;
    let sigma = population_std(history)?;
    if sigma == 0.0 {
        return Some(0.0);
    }
    let z = (value - mu) / sigma;
    z.is_finite().then_some(z)
}

// ─── Trend metrics ──────────────────────────────────────────────────

/// Simple moving average, aligned with `series`.
///
/// Position `i` holds the mean of `series[i + 1 - window ..= i]` when that
/// window is full and entirely finite, otherwise `None`. Unlike the other
/// metrics this works on the raw series so positions stay aligned.
pub fn sma(series: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = series.len();
    let mut result = vec![None; n];
    if window == 0 || n < window {
        return result;
    }

    for i in (window - 1)..n {
        let slice = &series[(i + 1 - window)..=i];
        if slice.iter().all(|v| v.is_finite()) {
            result[i] = Some(slice.iter().sum::<f64>() / window as f64);
        }
    }
    result
}

/// Most recent defined value of [`sma`].
pub fn trailing_sma(series: &[f64], window: usize) -> Option<f64> {
    sma(series, window).into_iter().rev().flatten().next()
}

/// `last / value_window_ago - 1`. Needs more than `window` finite values.
pub fn momentum(series: &[f64], window: usize) -> Option<f64> {
    let s = finite(series);
    if s.len() <= window {
        return None;
    }
    let last = s[s.len() - 1];
    let prev = s[s.len() - 1 - window];
    if prev == 0.0 {
        return None;
    }
    Some(last / prev - 1.0)
}

// ─── Risk metrics ───────────────────────────────────────────────────

/// `ln(p_t / p_prev)`, defined only for a strictly positive finite ratio.
pub fn log_return(p_t: f64, p_prev: f64) -> Option<f64> {
    let ratio = p_t / p_prev;
    if ratio.is_finite() && ratio > 0.0 {
        Some(ratio.ln())
    } else {
        None
    }
}

/// Log returns between consecutive entries of the raw series (`len - 1` items).
pub fn log_returns(series: &[f64]) -> Vec<Option<f64>> {
    series
        .windows(2)
        .map(|w| log_return(w[1], w[0]))
        .collect()
}

/// Annualized volatility: population std of the last `window` valid log
/// returns times `sqrt(annualization_factor)`.
pub fn volatility(series: &[f64], window: usize, annualization_factor: u32) -> Option<f64> {
    let returns: Vec<f64> = log_returns(series).into_iter().flatten().collect();
    if window == 0 || returns.len() < window {
        return None;
    }
    let sigma = population_std(&returns[returns.len() - window..])?;
    Some(sigma * f64::from(annualization_factor).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
        assert!(
            (actual - expected).abs() < epsilon,
            "assert_approx failed: actual={actual}, expected={expected}"
        );
    }

    #[test]
    fn percentile_rank_basic() {
        let h = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile_rank(&h, 3.0), Some(0.6));
        assert_eq!(percentile_rank(&h, 1.0), Some(0.2));
        assert_eq!(percentile_rank(&h, 10.0), Some(1.0));
        assert_eq!(percentile_rank(&h, 0.0), Some(0.0));
    }

    #[test]
    fn percentile_rank_ignores_nan_and_handles_empty() {
        assert_eq!(percentile_rank(&[], 1.0), None);
        assert_eq!(percentile_rank(&[f64::NAN], 1.0), None);
        assert_eq!(percentile_rank(&[1.0, f64::NAN, 3.0], 2.0), Some(0.5));
    }

    #[test]
    fn z_score_constant_history_is_zero() {
        let h = [2.0, 2.0, 2.0, 2.0];
        assert_eq!(z_score(&h, 2.0), Some(0.0));
        assert_eq!(z_score(&h, 10.0), Some(0.0));
    }

    #[test]
    fn z_score_uses_population_std() {
        // mean 3, population std sqrt(2)
        let h = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_approx(z_score(&h, 5.0).unwrap(), 2.0 / 2f64.sqrt(), 1e-12);
        assert_eq!(z_score(&[], 1.0), None);
    }

    #[test]
    fn sma_requires_full_window() {
        let result = sma(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0], 5);
        assert_eq!(result.len(), 7);
        assert!(result[..4].iter().all(Option::is_none));
        assert_approx(result[4].unwrap(), 12.0, 1e-12);
        assert_approx(result[6].unwrap(), 14.0, 1e-12);
    }

    #[test]
    fn sma_window_with_nan_is_none() {
        let result = sma(&[10.0, 11.0, f64::NAN, 13.0, 14.0, 15.0], 3);
        assert!(result[2].is_none());
        assert!(result[3].is_none());
        assert!(result[4].is_none());
        assert_approx(result[5].unwrap(), 14.0, 1e-12);
    }

    #[test]
    fn trailing_sma_is_last_defined() {
        assert_approx(trailing_sma(&[1.0, 2.0, 3.0, 4.0], 2).unwrap(), 3.5, 1e-12);
        assert_eq!(trailing_sma(&[1.0, 2.0], 3), None);
        assert_eq!(trailing_sma(&[1.0, 2.0], 0), None);
    }

    #[test]
    fn momentum_simple() {
        // window 2: last 121, two steps back 100
        assert_approx(momentum(&[100.0, 110.0, 121.0], 2).unwrap(), 0.21, 1e-12);
    }

    #[test]
    fn momentum_needs_more_than_window() {
        assert_eq!(momentum(&[100.0, 110.0], 2), None);
        assert_eq!(momentum(&[0.0, 1.0, 2.0], 2), None);
    }

    #[test]
    fn log_return_rejects_non_positive_ratio() {
        assert_approx(log_return(2.0, 1.0).unwrap(), 2f64.ln(), 1e-12);
        assert_eq!(log_return(-1.0, 1.0), None);
        assert_eq!(log_return(0.0, 1.0), None);
        assert_eq!(log_return(1.0, 0.0), None);
    }

    #[test]
    fn volatility_of_geometric_series_is_zero() {
        let v = volatility(&[1.0, 2.0, 4.0, 8.0, 16.0, 32.0], 3, 252).unwrap();
        assert_approx(v, 0.0, 1e-12);
    }

    #[test]
    fn volatility_positive_when_returns_vary() {
        let v = volatility(&[1.0, 2.0, 3.0, 2.0, 4.0, 3.0], 3, 252).unwrap();
        assert!(v > 0.0);
    }

    #[test]
    fn volatility_needs_window_returns() {
        assert_eq!(volatility(&[1.0, 2.0, 3.0], 3, 252), None);
        assert!(volatility(&[1.0, 2.0, 3.0, 4.0], 3, 252).is_some());
    }

    #[test]
    fn default_config_matches_ranking_windows() {
        let cfg = MetricConfig::default();
        assert_eq!(cfg.vol_window, 90);
        assert_eq!(cfg.mom_window, 60);
        assert_eq!(cfg.sma_window, 200);
        assert_eq!(cfg.annualization_factor, 252);
    }
}
