//! Report export: JSON, CSV and Markdown.
//!
//! - **JSON**: the whole `RankingReport`
//! - **CSV**: one table per ranking view, fixed column set, empty cells for
//!   missing values
//! - **Markdown**: highlights, the four ranking tables and a per-target
//!   explanation; missing values render as `—`

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fxrank_core::analytics::{RankingView, Scores};

use crate::report::RankingReport;

/// Column order of every per-view CSV table.
pub const CSV_COLUMNS: [&str; 12] = [
    "target",
    "as_of",
    "rate_today",
    "percentile_5y",
    "zscore_5y",
    "value_score",
    "mom_60d",
    "sma_200_diff",
    "trend_score",
    "vol_90d",
    "risk_score",
    "overall_score",
];

const MISSING: &str = "—";

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(report: &RankingReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize RankingReport to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

fn csv_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

/// One ranking view as CSV, rows in ranking order.
pub fn export_view_csv(rows: &[Scores]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_COLUMNS)?;

    for s in rows {
        wtr.write_record([
            s.target.code().to_string(),
            s.as_of.to_string(),
            format!("{:.6}", s.rate_today),
            csv_cell(s.percentile_5y),
            csv_cell(s.zscore_5y),
            csv_cell(s.value_score),
            csv_cell(s.mom_60d),
            csv_cell(s.sma_200_diff),
            csv_cell(s.trend_score),
            csv_cell(s.vol_90d),
            csv_cell(s.risk_score),
            csv_cell(s.overall_score),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Markdown report ────────────────────────────────────────────────

fn md(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.decimals$}"))
}

fn target_or_missing(s: Option<&Scores>) -> String {
    s.map_or_else(|| MISSING.to_string(), |s| s.target.to_string())
}

/// Human-readable single-base report.
pub fn render_markdown(report: &RankingReport) -> String {
    let base = report.base;
    if report.is_empty() {
        return format!("# FxRank report: {base}\n\nNo data for base={base}\n");
    }

    let mut out = String::new();
    let as_of = report
        .as_of
        .map_or_else(|| MISSING.to_string(), |d| d.to_string());

    let _ = writeln!(out, "# FxRank report: {base}\n");
    let _ = writeln!(out, "As of {as_of}. Rates are {base} per 1 unit of target.");
    let _ = writeln!(out, "This is an opportunity ranking, not a forecast.\n");

    let _ = writeln!(out, "## Highlights\n");
    let _ = writeln!(out, "- Best overall: {}", target_or_missing(report.best_overall()));
    let _ = writeln!(out, "- Best value: {}", target_or_missing(report.best_value()));
    let _ = writeln!(out, "- Lowest risk: {}", target_or_missing(report.lowest_risk()));

    let _ = writeln!(out, "\n## Overall ranking\n");
    let _ = writeln!(out, "| Target | Overall | Value | Trend | Risk |");
    let _ = writeln!(out, "|--------|---------|-------|-------|------|");
    for s in &report.rankings.overall {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            s.target,
            md(s.overall_score, 4),
            md(s.value_score, 4),
            md(s.trend_score, 4),
            md(s.risk_score, 4)
        );
    }

    let _ = writeln!(out, "\n## Value\n");
    let _ = writeln!(out, "| Target | Value | Percentile 5y | Z-score 5y |");
    let _ = writeln!(out, "|--------|-------|---------------|------------|");
    for s in &report.rankings.value {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            s.target,
            md(s.value_score, 4),
            md(s.percentile_5y, 4),
            md(s.zscore_5y, 4)
        );
    }

    let _ = writeln!(out, "\n## Trend\n");
    let _ = writeln!(out, "| Target | Trend | Momentum 60d | SMA 200 diff |");
    let _ = writeln!(out, "|--------|-------|--------------|--------------|");
    for s in &report.rankings.trend {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            s.target,
            md(s.trend_score, 4),
            md(s.mom_60d, 4),
            md(s.sma_200_diff, 4)
        );
    }

    let _ = writeln!(out, "\n## Risk\n");
    let _ = writeln!(out, "| Target | Risk | Vol 90d |");
    let _ = writeln!(out, "|--------|------|---------|");
    for s in &report.rankings.risk {
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            s.target,
            md(s.risk_score, 4),
            md(s.vol_90d, 4)
        );
    }

    let _ = writeln!(out, "\n## Explain\n");
    for s in &report.rankings.overall {
        let _ = writeln!(
            out,
            "- **{}**: overall {}; rate today {:.4}; percentile {}, z-score {}; \
             momentum {}, SMA diff {}; volatility {}",
            s.target,
            md(s.overall_score, 3),
            s.rate_today,
            md(s.percentile_5y, 3),
            md(s.zscore_5y, 3),
            md(s.mom_60d, 3),
            md(s.sma_200_diff, 3),
            md(s.vol_90d, 3)
        );
    }

    out
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Files written by [`save_report`].
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub markdown: PathBuf,
    pub json: PathBuf,
    pub csv: Vec<PathBuf>,
}

/// Write `fxrank_{BASE}.md`, `fxrank_{BASE}.json` and one
/// `fxrank_{BASE}_{view}.csv` per view under `reports_dir`.
pub fn save_report(report: &RankingReport, reports_dir: &Path) -> Result<ReportPaths> {
    std::fs::create_dir_all(reports_dir)
        .with_context(|| format!("failed to create {}", reports_dir.display()))?;

    let stem = format!("fxrank_{}", report.base);

    let markdown = reports_dir.join(format!("{stem}.md"));
    std::fs::write(&markdown, render_markdown(report))
        .with_context(|| format!("failed to write {}", markdown.display()))?;

    let json = reports_dir.join(format!("{stem}.json"));
    std::fs::write(&json, export_json(report)?)
        .with_context(|| format!("failed to write {}", json.display()))?;

    let mut csv = Vec::with_capacity(RankingView::ALL.len());
    for view in RankingView::ALL {
        let path = reports_dir.join(format!("{stem}_{view}.csv"));
        std::fs::write(&path, export_view_csv(report.rankings.view(view))?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        csv.push(path);
    }

    log::info!("report written to {}", markdown.display());
    Ok(ReportPaths {
        markdown,
        json,
        csv,
    })
}
