//! FxRank CLI: fetch, report and cache commands.
//!
//! Commands:
//! - `fetch`: bring the local rate cache up to date
//! - `report`: rank every target for a base currency and write the report bundle
//! - `cache status`: row count, date range and size of the cache file
//!
//! This is an opportunity ranking, not a forecast.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use fxrank_core::data::{EurRateProvider, FrankfurterProvider, SyntheticProvider};
use fxrank_core::domain::Currency;
use fxrank_runner::{
    cache_status, export_json, run_fetch, run_report, save_report, RankingReport, Settings,
};

#[derive(Parser)]
#[command(
    name = "fxrank",
    version,
    about = "fxrank: FX opportunity ranking for PLN, USD, EUR and GBP (not a forecast)"
)]
struct Cli {
    /// Settings file (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch missing rates and merge them into the local cache.
    Fetch {
        /// Cache file. Overrides the settings file.
        #[arg(long)]
        cache_path: Option<PathBuf>,

        /// Lookback window in days for an empty cache.
        #[arg(long)]
        lookback_days: Option<i64>,

        /// Never fetch before this date (YYYY-MM-DD).
        #[arg(long)]
        min_start_date: Option<NaiveDate>,

        /// Use offline synthetic rates instead of the network.
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
    /// Rank targets for a base currency and write Markdown, CSV and JSON.
    Report {
        /// Base currency (PLN, USD, EUR, GBP), case-insensitive.
        #[arg(long, short = 'b')]
        base: Currency,

        /// Cache file. Overrides the settings file.
        #[arg(long)]
        cache_path: Option<PathBuf>,

        /// Output directory. Overrides the settings file.
        #[arg(long)]
        reports_dir: Option<PathBuf>,

        /// Print the full report as JSON instead of the summary table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Cache management commands.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Report row count, date range and size of the cache file.
    Status {
        /// Cache file. Overrides the settings file.
        #[arg(long)]
        cache_path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    log::debug!("settings: {settings:?}");

    match cli.command {
        Commands::Fetch {
            cache_path,
            lookback_days,
            min_start_date,
            synthetic,
        } => {
            if let Some(p) = cache_path {
                settings.paths.cache_file = p;
            }
            if let Some(days) = lookback_days {
                settings.fetch.lookback_days = days;
            }
            if min_start_date.is_some() {
                settings.fetch.min_start_date = min_start_date;
            }
            run_fetch_cmd(&settings, synthetic)
        }
        Commands::Report {
            base,
            cache_path,
            reports_dir,
            json,
        } => {
            if let Some(p) = cache_path {
                settings.paths.cache_file = p;
            }
            if let Some(d) = reports_dir {
                settings.paths.reports_dir = d;
            }
            run_report_cmd(&settings, base, json)
        }
        Commands::Cache {
            action: CacheAction::Status { cache_path },
        } => {
            if let Some(p) = cache_path {
                settings.paths.cache_file = p;
            }
            run_cache_status(&settings);
            Ok(())
        }
    }
}

fn run_fetch_cmd(settings: &Settings, synthetic: bool) -> Result<()> {
    let provider: Box<dyn EurRateProvider> = if synthetic {
        Box::new(SyntheticProvider::new())
    } else {
        Box::new(FrankfurterProvider::new(settings.provider.clone())?)
    };
    let today = chrono::Local::now().date_naive();

    let summary = run_fetch(settings, provider.as_ref(), today)
        .with_context(|| format!("fetch from {} failed", provider.name()))?;

    match summary.range {
        Some(range) => {
            println!("Fetched {range} from {}", provider.name());
            println!("New cross rates: {}", summary.cross_rows);
        }
        None => println!("Cache already up to date through {today}"),
    }
    println!("Cache: {}", settings.paths.cache_file.display());
    println!("Rows: {}", summary.total_rows);
    Ok(())
}

fn run_report_cmd(settings: &Settings, base: Currency, json: bool) -> Result<()> {
    let report = run_report(settings, base)?;
    let paths = save_report(&report, &settings.paths.reports_dir)?;

    if json {
        println!("{}", export_json(&report)?);
    } else {
        print_overall(&report);
    }
    println!();
    println!("Report generated: {}", paths.markdown.display());
    Ok(())
}

fn print_overall(report: &RankingReport) {
    if report.is_empty() {
        println!("No data for base={} (run `fxrank fetch` first)", report.base);
        return;
    }
    let fmt = |v: Option<f64>| v.map_or_else(|| "—".to_string(), |v| format!("{v:.3}"));

    println!();
    println!(
        "=== Overall ranking: base {} (as of {}) ===",
        report.base,
        report.as_of.map(|d| d.to_string()).unwrap_or_default()
    );
    println!(
        "{:<4} {:<6} {:>10} {:>8} {:>8} {:>8} {:>8}",
        "#", "Target", "Rate", "Overall", "Value", "Trend", "Risk"
    );
    println!("{}", "-".repeat(58));
    for (i, s) in report.rankings.overall.iter().enumerate() {
        println!(
            "{:<4} {:<6} {:>10.4} {:>8} {:>8} {:>8} {:>8}",
            i + 1,
            s.target.code(),
            s.rate_today,
            fmt(s.overall_score),
            fmt(s.value_score),
            fmt(s.trend_score),
            fmt(s.risk_score)
        );
    }
}

fn run_cache_status(settings: &Settings) {
    let status = cache_status(settings);
    if !status.exists {
        println!("Cache file does not exist: {}", status.path.display());
        return;
    }

    println!("Cache: {}", status.path.display());
    println!("Size: {}", format_size(status.size_bytes));
    match status.meta {
        Some(meta) => {
            let range = match (meta.start_date, meta.end_date) {
                (Some(s), Some(e)) => format!("{s} to {e}"),
                _ => "empty".to_string(),
            };
            println!("Rows: {}", meta.row_count);
            println!("Pairs: {}", meta.pair_count);
            println!("Date range: {range}");
            println!("Written at: {}", meta.written_at.format("%Y-%m-%d %H:%M:%S"));
            println!("Data hash: {}", &meta.data_hash[..meta.data_hash.len().min(16)]);
        }
        None => println!("No metadata sidecar found"),
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
