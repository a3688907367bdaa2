//! Splits probe results into failures and counts, and assembles the state
//! every renderer reads from.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::classify::{tally_categories, ErrorCategory};
use crate::models::{FailureRecord, RawResult, RunInfo, Statistics, Tally};

/// Failures and run counts from a single pass over the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Failed probes in input order.
    pub failures: Vec<FailureRecord>,
    pub statistics: Statistics,
}

impl Analysis {
    /// Analyzes `results` in order.
    ///
    /// A record counts as failed only when `success` is exactly `false`, and
    /// as successful only when it is exactly `true`. Anything else still
    /// counts toward the total.
    pub fn from_results(results: &[RawResult], now: DateTime<Utc>) -> Self {
        let mut failures = Vec::new();
        let mut success = 0;
        let mut undecided = 0;

        for (position, raw) in results.iter().enumerate() {
            match raw.success {
                Some(false) => failures.push(FailureRecord::from_raw(position + 1, raw, now)),
                Some(true) => success += 1,
                None => undecided += 1,
            }
        }

        if undecided > 0 {
            warn!(
                "{} records have no boolean success flag; counted in the total only",
                undecided
            );
        }

        let statistics = Statistics::new(results.len(), success, failures.len());
        info!(
            "Analysis complete: {} failed, {} succeeded, {} total",
            statistics.failed, statistics.success, statistics.total
        );

        Self {
            failures,
            statistics,
        }
    }
}

/// Everything the renderers need, built once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportModel {
    pub run: RunInfo,
    pub statistics: Statistics,
    pub failures: Vec<FailureRecord>,
    pub categories: Tally<ErrorCategory>,
}

impl ReportModel {
    pub fn new(analysis: Analysis, run: RunInfo) -> Self {
        let categories = tally_categories(&analysis.failures);
        Self {
            run,
            statistics: analysis.statistics,
            failures: analysis.failures,
            categories,
        }
    }

    /// Runs the analyzer and classifier over `results`.
    pub fn build(results: &[RawResult], run: RunInfo) -> Self {
        let analysis = Analysis::from_results(results, run.generated_at);
        Self::new(analysis, run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap()
    }

    fn result(success: Option<bool>) -> RawResult {
        RawResult {
            success,
            ..Default::default()
        }
    }

    #[test]
    fn test_indices_follow_input_positions() {
        let results = vec![
            result(Some(true)),
            result(Some(false)),
            result(None),
            result(Some(false)),
        ];
        let analysis = Analysis::from_results(&results, now());
        let indices: Vec<_> = analysis.failures.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![2, 4]);
    }

    #[test]
    fn test_absent_success_counted_in_total_only() {
        let results = vec![result(None), result(Some(true)), result(Some(false))];
        let stats = Analysis::from_results(&results, now()).statistics;
        assert_eq!(stats.total, 3);
        assert_eq!(stats.success, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.failure_rate, 33.33);
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_undecided_records_are_reported() {
        let results = vec![result(None), result(Some(true)), result(None)];
        Analysis::from_results(&results, now());
        assert!(logs_contain("2 records have no boolean success flag"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_no_warning_when_every_record_decided() {
        Analysis::from_results(&[result(Some(true)), result(Some(false))], now());
        assert!(!logs_contain("no boolean success flag"));
    }

    #[test]
    fn test_empty_input() {
        let analysis = Analysis::from_results(&[], now());
        assert!(analysis.failures.is_empty());
        assert_eq!(analysis.statistics, Statistics::default());
    }

    #[test]
    fn test_model_tallies_every_failure() {
        let results = vec![result(Some(false)), result(Some(false)), result(Some(true))];
        let run = RunInfo {
            generated_at: now(),
            source_file: "results.json".into(),
        };
        let model = ReportModel::build(&results, run);
        assert_eq!(model.categories.total(), model.statistics.failed);
        assert_eq!(model.failures[0].timestamp, "2026-10-16T08:30:00.000Z");
    }
}
