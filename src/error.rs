//! Error types for report generation.
//!
//! Every variant is fatal: the pipeline never writes a partial report after
//! one of these is raised. Missing fields inside an individual record are not
//! errors, they are defaulted by the analyzer.

use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for probe-report operations.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The input source could not be read at all.
    #[error("cannot read results from {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not a JSON array of objects.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The narrative template failed to render.
    #[error("template render error: {0}")]
    Render(#[from] tera::Error),

    /// Aggregating the structured breakdowns failed.
    #[error("analytics error: {0}")]
    Analytics(#[from] polars::prelude::PolarsError),

    /// Encoding the structured report failed.
    #[error("JSON serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing a report file failed.
    #[error("cannot write report to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = ReportError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_unavailable_names_the_path() {
        let err = ReportError::SourceUnavailable {
            path: PathBuf::from("missing/results.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("missing/results.json"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn serde_errors_convert_with_question_mark() {
        fn parse() -> Result<serde_json::Value> {
            Ok(serde_json::from_str("{")?)
        }
        assert!(matches!(parse(), Err(ReportError::Serialize(_))));
    }
}
