//! Property tests for the core invariants.
//!
//! Uses proptest to verify:
//! 1. Cross-rate shape: N * (N - 1) directed rows per date
//! 2. Reciprocal consistency: rate(a, b) * rate(b, a) ≈ 1
//! 3. EUR-quoted pass-through: rate(X, EUR) is the feed value unchanged
//! 4. Merge idempotence and right bias
//! 5. Metric ranges and ranking determinism

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use std::collections::HashSet;

use fxrank_core::analytics::cross_rates::generate_cross_rates;
use fxrank_core::analytics::metrics::{percentile_rank, z_score};
use fxrank_core::analytics::ranker::{build_rankings, rank_targets, RankingView};
use fxrank_core::analytics::MetricConfig;
use fxrank_core::data::{merge, normalize};
use fxrank_core::domain::{Currency, EurRate, Pair, RateObservation};

// ── Strategies (proptest) ────────────────────────────────────────────

fn day(offset: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + Duration::days(i64::from(offset))
}

fn arb_rate() -> impl Strategy<Value = f64> {
    0.01..100.0_f64
}

/// One complete EUR-quoted day (USD, PLN, GBP).
fn arb_feed_day() -> impl Strategy<Value = (f64, f64, f64)> {
    (arb_rate(), arb_rate(), arb_rate())
}

fn feed(days: &[(f64, f64, f64)]) -> Vec<EurRate> {
    days.iter()
        .enumerate()
        .flat_map(|(i, &(usd, pln, gbp))| {
            let date = day(i as u32);
            [
                EurRate::new(date, Currency::Usd, usd),
                EurRate::new(date, Currency::Pln, pln),
                EurRate::new(date, Currency::Gbp, gbp),
            ]
        })
        .collect()
}

/// Observations drawn from a small key space so collisions are common.
fn arb_observations() -> impl Strategy<Value = Vec<RateObservation>> {
    let pairs = Pair::all();
    prop::collection::vec((0u32..5, 0usize..pairs.len(), arb_rate()), 0..40).prop_map(
        move |rows| {
            rows.into_iter()
                .map(|(d, p, rate)| {
                    let pair = pairs[p];
                    RateObservation::new(day(d), pair.base, pair.quote, rate).unwrap()
                })
                .collect()
        },
    )
}

fn rate_of(out: &[RateObservation], date: NaiveDate, base: Currency, quote: Currency) -> f64 {
    out.iter()
        .find(|o| o.key() == (date, base, quote))
        .map(|o| o.rate)
        .unwrap()
}

// ── 1-3. Cross rates ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn cross_rates_have_all_directed_pairs(days in prop::collection::vec(arb_feed_day(), 1..6)) {
        let out = generate_cross_rates(&feed(&days)).unwrap();
        let n = Currency::ALL.len();
        prop_assert_eq!(out.len(), days.len() * n * (n - 1));
        let keys: HashSet<_> = out.iter().map(|o| o.key()).collect();
        prop_assert_eq!(keys.len(), out.len());
    }

    #[test]
    fn cross_rates_are_reciprocal(days in prop::collection::vec(arb_feed_day(), 1..4)) {
        let out = generate_cross_rates(&feed(&days)).unwrap();
        for o in &out {
            let inverse = rate_of(&out, o.date, o.quote, o.base);
            prop_assert!((o.rate * inverse - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn eur_quote_is_pass_through((usd, pln, gbp) in arb_feed_day()) {
        let out = generate_cross_rates(&feed(&[(usd, pln, gbp)])).unwrap();
        let date = day(0);
        prop_assert_eq!(rate_of(&out, date, Currency::Usd, Currency::Eur), usd);
        prop_assert_eq!(rate_of(&out, date, Currency::Pln, Currency::Eur), pln);
        prop_assert_eq!(rate_of(&out, date, Currency::Gbp, Currency::Eur), gbp);
    }
}

// ── 4. Merge ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn merge_is_idempotent(a in arb_observations(), b in arb_observations()) {
        let once = merge(&a, &b);
        prop_assert_eq!(merge(&once, &b), once.clone());
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn merge_incoming_wins(a in arb_observations(), b in arb_observations()) {
        let merged = merge(&a, &b);
        for incoming in normalize(&b) {
            let stored = merged.iter().find(|o| o.key() == incoming.key()).unwrap();
            prop_assert_eq!(stored.rate, incoming.rate);
        }
    }

    #[test]
    fn merge_output_is_sorted_and_unique(a in arb_observations(), b in arb_observations()) {
        let merged = merge(&a, &b);
        prop_assert!(merged.windows(2).all(|w| w[0].key() < w[1].key()));
        let expected: HashSet<_> = a.iter().chain(&b).map(|o| o.key()).collect();
        prop_assert_eq!(merged.len(), expected.len());
    }
}

// ── 5. Metrics and rankings ──────────────────────────────────────────

proptest! {
    #[test]
    fn percentile_rank_in_unit_interval(
        history in prop::collection::vec(-1e6..1e6_f64, 1..50),
        value in -1e6..1e6_f64,
    ) {
        let p = percentile_rank(&history, value).unwrap();
        prop_assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn z_score_of_constant_history_is_zero(c in 1u32..1000, n in 1usize..30, value in arb_rate()) {
        let history = vec![f64::from(c); n];
        prop_assert_eq!(z_score(&history, value), Some(0.0));
    }

    #[test]
    fn rankings_do_not_depend_on_input_order(days in prop::collection::vec(arb_feed_day(), 1..30)) {
        let observations = generate_cross_rates(&feed(&days)).unwrap();
        let scores = rank_targets(&observations, Currency::Pln, &MetricConfig::default());
        let mut reversed = scores.clone();
        reversed.reverse();

        let forward = build_rankings(&scores);
        let backward = build_rankings(&reversed);
        for view in RankingView::ALL {
            let f: Vec<_> = forward.view(view).iter().map(|s| s.target).collect();
            let b: Vec<_> = backward.view(view).iter().map(|s| s.target).collect();
            prop_assert_eq!(f, b);
        }
    }
}
