//! Integration tests for the fetch → report → export flow.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use fxrank_core::data::SyntheticProvider;
use fxrank_core::domain::{Currency, RateObservation};
use fxrank_core::analytics::{MetricConfig, RankingView};
use fxrank_runner::export::CSV_COLUMNS;
use fxrank_runner::{
    export_view_csv, render_markdown, run_fetch, run_report, save_report, RankingReport, Settings,
};

fn settings_in(dir: &std::path::Path) -> Settings {
    Settings::from_toml(&format!(
        r#"
[paths]
cache_file = "{}"
reports_dir = "{}"

[fetch]
lookback_days = 400
"#,
        dir.join("data").join("cache.parquet").display(),
        dir.join("reports").display()
    ))
    .unwrap()
}

#[test]
fn synthetic_fetch_produces_full_report_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    let today = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap();

    run_fetch(&settings, &SyntheticProvider::new(), today).unwrap();
    let report = run_report(&settings, Currency::Pln).unwrap();
    let paths = save_report(&report, &settings.paths.reports_dir).unwrap();

    let md = std::fs::read_to_string(&paths.markdown).unwrap();
    assert!(md.starts_with("# FxRank report: PLN"));
    assert!(md.contains("As of 2026-02-06"));

    for view in RankingView::ALL {
        let csv_path = settings
            .paths
            .reports_dir
            .join(format!("fxrank_PLN_{view}.csv"));
        let csv = std::fs::read_to_string(csv_path).unwrap();
        assert_eq!(csv.lines().count(), 4, "view {view}");
    }
}

#[test]
fn second_fetch_same_day_does_not_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    let today = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap();

    let first = run_fetch(&settings, &SyntheticProvider::new(), today).unwrap();
    let second = run_fetch(&settings, &SyntheticProvider::new(), today).unwrap();
    assert!(first.wrote);
    assert!(!second.wrote);
    assert_eq!(first.total_rows, second.total_rows);
}

#[test]
fn empty_cache_report_file_says_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    let report = run_report(&settings, Currency::Gbp).unwrap();
    let paths = save_report(&report, &settings.paths.reports_dir).unwrap();
    let md = std::fs::read_to_string(paths.markdown).unwrap();
    assert!(md.contains("No data for base=GBP"));
}

fn cache_with_lengths(lengths: &[usize]) -> Vec<RateObservation> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let targets = [Currency::Usd, Currency::Eur, Currency::Gbp];
    let mut out = Vec::new();
    for (target, &n) in targets.iter().zip(lengths) {
        for i in 0..n {
            let rate = 4.0 + (i as f64 * 0.37).sin() * 0.2;
            out.push(
                RateObservation::new(start + Duration::days(i as i64), Currency::Pln, *target, rate)
                    .unwrap(),
            );
        }
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Every view lists every scored target once, whatever the history length.
    #[test]
    fn csv_shape_is_stable(lengths in prop::collection::vec(0usize..260, 3)) {
        let cache = cache_with_lengths(&lengths);
        let report = RankingReport::build(&cache, Currency::Pln, &MetricConfig::default());
        let expected = lengths.iter().filter(|&&n| n > 0).count();
        prop_assert_eq!(report.scores.len(), expected);

        for view in RankingView::ALL {
            let csv = export_view_csv(report.rankings.view(view)).unwrap();
            prop_assert_eq!(csv.lines().count(), expected + 1);
            for line in csv.lines() {
                prop_assert_eq!(line.split(',').count(), CSV_COLUMNS.len());
            }
        }
        prop_assert!(!render_markdown(&report).is_empty());
    }
}
