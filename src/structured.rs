//! JSON report for tooling.
//!
//! The IP-version and protocol counts here are aggregated with Polars,
//! separately from the markdown report, and must agree with it.

use chrono::SecondsFormat;
use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::analysis::ReportModel;
use crate::classify::ErrorCategory;
use crate::error::Result;
use crate::models::{FailureRecord, Tally};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredReport<'a> {
    pub report_info: ReportInfo<'a>,
    pub statistics: StatisticsGroup<'a>,
    pub failed_tests: &'a [FailureRecord],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportInfo<'a> {
    pub generated_at: String,
    pub source_file: &'a str,
    pub total_tests: usize,
    pub failed_tests: usize,
    pub success_tests: usize,
    pub failure_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsGroup<'a> {
    pub by_ip_version: IpVersionCounts,
    pub by_protocol: Tally<String>,
    pub by_error_type: &'a Tally<ErrorCategory>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IpVersionCounts {
    pub ipv4: usize,
    pub ipv6: usize,
}

impl<'a> StructuredReport<'a> {
    pub fn build(model: &'a ReportModel) -> Result<Self> {
        let (by_ip_version, by_protocol) = aggregate(&model.failures)?;
        let stats = &model.statistics;

        Ok(Self {
            report_info: ReportInfo {
                generated_at: model
                    .run
                    .generated_at
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
                source_file: &model.run.source_file,
                total_tests: stats.total,
                failed_tests: stats.failed,
                success_tests: stats.success,
                failure_rate: stats.failure_rate,
            },
            statistics: StatisticsGroup {
                by_ip_version,
                by_protocol,
                by_error_type: &model.categories,
            },
            failed_tests: &model.failures,
        })
    }
}

/// Renders the pretty-printed JSON report.
pub fn render(model: &ReportModel) -> Result<String> {
    let report = StructuredReport::build(model)?;
    let json = serde_json::to_string_pretty(&report)?;
    debug!("Rendered structured report ({} bytes)", json.len());
    Ok(json)
}

/// Counts failures per IP version and per protocol using Polars.
fn aggregate(failures: &[FailureRecord]) -> Result<(IpVersionCounts, Tally<String>)> {
    let df = df!(
        "ip_version" => failures.iter().map(|f| f.ip_version.as_str()).collect::<Vec<_>>(),
        "protocol" => failures.iter().map(|f| f.protocol.as_str()).collect::<Vec<_>>()
    )?;

    let count_version = |version: &str| -> Result<usize> {
        let matching = df
            .clone()
            .lazy()
            .filter(col("ip_version").eq(lit(version)))
            .collect()?;
        Ok(matching.height())
    };
    let by_ip_version = IpVersionCounts {
        ipv4: count_version("IPv4")?,
        ipv6: count_version("IPv6")?,
    };

    // group_by_stable keeps protocols in order of first failure
    let grouped = df
        .lazy()
        .group_by_stable([col("protocol")])
        .agg([len().alias("count")])
        .collect()?;

    let protocols: Vec<String> = grouped
        .column("protocol")?
        .str()?
        .into_iter()
        .flatten()
        .map(|s| s.to_string())
        .collect();
    let counts: Vec<usize> = grouped
        .column("count")?
        .cast(&DataType::UInt64)?
        .u64()?
        .into_iter()
        .flatten()
        .map(|v| v as usize)
        .collect();

    let mut by_protocol = Tally::new();
    for (protocol, count) in protocols.into_iter().zip(counts) {
        by_protocol.add_count(protocol, count);
    }

    Ok((by_ip_version, by_protocol))
}
