//! Criterion benchmarks for FxRank hot paths.
//!
//! Benchmarks:
//! 1. Cross-rate expansion of a 5-year EUR feed
//! 2. Merge of one new day into a 5-year store
//! 3. Ranking all targets for one base

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fxrank_core::analytics::{build_rankings, generate_cross_rates, rank_targets, MetricConfig};
use fxrank_core::data::{merge, EurRateProvider, SyntheticProvider};
use fxrank_core::domain::{Currency, EurRate};

// ── Helpers ──────────────────────────────────────────────────────────

fn five_year_feed() -> Vec<EurRate> {
    let start = NaiveDate::from_ymd_opt(2021, 2, 8).unwrap();
    let end = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap();
    SyntheticProvider::new().fetch_eur_series(start, end).unwrap()
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_cross_rates(c: &mut Criterion) {
    let feed = five_year_feed();
    c.bench_function("cross_rates_5y", |b| {
        b.iter(|| generate_cross_rates(black_box(&feed)).unwrap())
    });
}

fn bench_merge(c: &mut Criterion) {
    let store = generate_cross_rates(&five_year_feed()).unwrap();
    let day = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
    let incoming = generate_cross_rates(&[
        EurRate::new(day, Currency::Usd, 1.10),
        EurRate::new(day, Currency::Pln, 4.40),
        EurRate::new(day, Currency::Gbp, 0.88),
    ])
    .unwrap();
    c.bench_function("merge_one_day_into_5y", |b| {
        b.iter(|| merge(black_box(&store), black_box(&incoming)))
    });
}

fn bench_ranking(c: &mut Criterion) {
    let store = generate_cross_rates(&five_year_feed()).unwrap();
    let config = MetricConfig::default();
    c.bench_function("rank_pln_5y", |b| {
        b.iter(|| {
            let scores = rank_targets(black_box(&store), Currency::Pln, &config);
            build_rankings(&scores)
        })
    });
}

criterion_group!(benches, bench_cross_rates, bench_merge, bench_ranking);
criterion_main!(benches);
