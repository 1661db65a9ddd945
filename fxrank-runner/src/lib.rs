//! FxRank Runner: settings, fetch/report orchestration and report export.
//!
//! This crate builds on `fxrank-core` to provide:
//! - TOML settings with per-section defaults
//! - `run_fetch` / `run_report` entry points
//! - Ranking report assembly
//! - Markdown, CSV and JSON export

pub mod config;
pub mod export;
pub mod report;
pub mod runner;

pub use config::{ConfigError, PathSettings, Settings};
pub use export::{export_json, export_view_csv, render_markdown, save_report, ReportPaths};
pub use report::RankingReport;
pub use runner::{cache_status, run_fetch, run_report, RunError};
