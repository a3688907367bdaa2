//! Failure reports for HTTP/3 connectivity probe results.
//!
//! A run loads the probe records, splits out the failures, classifies them
//! and renders a markdown report, a JSON report and a terminal summary from
//! the same [`analysis::ReportModel`].

pub mod analysis;
pub mod classify;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod narrative;
pub mod output;
pub mod structured;
pub mod summary;

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

pub use analysis::{Analysis, ReportModel};
pub use classify::{classify, ErrorCategory};
pub use config::{Config, OutputFormat};
pub use error::{ReportError, Result};
pub use models::{FailureRecord, RawResult, RunInfo, Statistics};
pub use output::WrittenReports;

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub model: ReportModel,
    pub written: WrittenReports,
}

/// Loads the configured input and writes the requested reports.
pub fn run(config: &Config) -> Result<RunOutcome> {
    run_at(config, Utc::now())
}

/// Like [`run`], with the generation time supplied by the caller.
pub fn run_at(config: &Config, generated_at: DateTime<Utc>) -> Result<RunOutcome> {
    let results = data::load_results(&config.input)?;
    let run = RunInfo {
        generated_at,
        source_file: source_name(&config.input),
    };
    let model = ReportModel::build(&results, run);

    if !config.no_summary {
        print!("{}", summary::render(&model));
    }

    let written = output::write_reports(&model, config.format, &config.output_dir)?;
    info!("Report generation complete");
    Ok(RunOutcome { model, written })
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
