//! Data loading module - reads probe results from JSON.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ReportError, Result};
use crate::models::RawResult;

/// Loads probe results from the JSON file at `path`.
///
/// # Errors
///
/// Returns `ReportError::SourceUnavailable` if the file cannot be read.
/// Returns `ReportError::MalformedInput` if it is not a JSON array of objects.
pub fn load_results(path: &Path) -> Result<Vec<RawResult>> {
    info!("Reading probe results from {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| ReportError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let results = parse_results(&content)?;
    info!("Loaded {} probe records", results.len());
    Ok(results)
}

/// Parses a JSON array of probe result objects.
///
/// Fields inside each object are read leniently; the array and object shape
/// is not.
pub fn parse_results(content: &str) -> Result<Vec<RawResult>> {
    let document: Value = serde_json::from_str(content)
        .map_err(|e| ReportError::MalformedInput(format!("invalid JSON: {e}")))?;

    let entries = match document {
        Value::Array(entries) => entries,
        other => {
            return Err(ReportError::MalformedInput(format!(
                "expected an array of result records, found {}",
                kind(&other)
            )))
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            if !entry.is_object() {
                return Err(ReportError::MalformedInput(format!(
                    "record {} is {}, expected an object",
                    i + 1,
                    kind(&entry)
                )));
            }
            serde_json::from_value(entry)
                .map_err(|e| ReportError::MalformedInput(format!("record {}: {e}", i + 1)))
        })
        .inspect(|r| {
            if let Err(e) = r {
                debug!("Rejecting input: {}", e);
            }
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_array_in_order() {
        let results = parse_results(
            r#"[{"host": "a.example", "success": true}, {"host": "b.example", "success": false}]"#,
        )
        .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].host.as_deref(), Some("a.example"));
        assert_eq!(results[1].success, Some(false));
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_results("[]").unwrap().is_empty());
    }

    #[test]
    fn test_object_at_top_level_rejected() {
        let err = parse_results(r#"{"data": []}"#).unwrap_err();
        match err {
            ReportError::MalformedInput(msg) => assert!(msg.contains("an object")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_object_entry_rejected() {
        let err = parse_results(r#"[{"success": true}, 7]"#).unwrap_err();
        match err {
            ReportError::MalformedInput(msg) => assert!(msg.contains("record 2")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_syntax_error_rejected() {
        assert!(matches!(
            parse_results("[{"),
            Err(ReportError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = load_results(Path::new("/nonexistent/connectivity_results.json")).unwrap_err();
        assert!(matches!(err, ReportError::SourceUnavailable { .. }));
    }
}
