//! Writes rendered reports to timestamped files.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

use crate::analysis::ReportModel;
use crate::config::OutputFormat;
use crate::error::{ReportError, Result};
use crate::narrative::NarrativeRenderer;
use crate::structured;

const FILE_PREFIX: &str = "failed-test-report";

/// File-name-safe form of `at`, e.g. `2026-10-16T08-30-00-000Z`.
pub fn file_stamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

pub fn report_path(dir: &Path, stamp: &str, extension: &str) -> PathBuf {
    dir.join(format!("{FILE_PREFIX}-{stamp}.{extension}"))
}

/// Paths of the files a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenReports {
    pub narrative: Option<PathBuf>,
    pub structured: Option<PathBuf>,
}

/// Renders the requested reports and writes them into `dir`.
///
/// Everything is rendered before the first file is written, so a render
/// failure leaves no report behind.
pub fn write_reports(
    model: &ReportModel,
    format: OutputFormat,
    dir: &Path,
) -> Result<WrittenReports> {
    let narrative = if format.writes_narrative() {
        Some(NarrativeRenderer::new()?.render(model)?)
    } else {
        None
    };
    let structured = if format.writes_structured() {
        Some(structured::render(model)?)
    } else {
        None
    };

    fs::create_dir_all(dir).map_err(|source| ReportError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let stamp = file_stamp(model.run.generated_at);
    let mut written = WrittenReports::default();

    if let Some(report) = narrative {
        let path = report_path(dir, &stamp, "md");
        write_file(&path, &report)?;
        info!("Markdown report saved to {}", path.display());
        written.narrative = Some(path);
    }
    if let Some(report) = structured {
        let path = report_path(dir, &stamp, "json");
        write_file(&path, &report)?;
        info!("JSON report saved to {}", path.display());
        written.structured = Some(path);
    }

    Ok(written)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
