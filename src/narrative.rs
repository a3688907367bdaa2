//! Markdown report for people reading the results.

use chrono::Local;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use crate::analysis::ReportModel;
use crate::error::Result;
use crate::models::{FailureRecord, Tally};

const TEMPLATE_NAME: &str = "report.md";
const TEMPLATE: &str = include_str!("../templates/report.md");

pub const HOST_WIDTH: usize = 20;
pub const ERROR_WIDTH: usize = 50;
pub const SERVER_WIDTH: usize = 15;

const ELLIPSIS: &str = "...";

/// Shortens `s` to at most `max_chars` characters, ellipsis included.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let keep = max_chars.saturating_sub(ELLIPSIS.len());
        let truncated: String = s.chars().take(keep).collect();
        format!("{}{}", truncated, ELLIPSIS)
    } else {
        s.to_string()
    }
}

/// Makes `s` safe to place in one markdown table cell of at most
/// `max_chars` visible characters.
///
/// Line breaks become spaces and `|` is escaped after truncation, so the
/// escape never counts against the width and is never cut in half.
pub fn table_cell(s: &str, max_chars: usize) -> String {
    let line = s.replace("\r\n", " ").replace(['\r', '\n'], " ");
    truncate_chars(&line, max_chars).replace('|', "\\|")
}

/// Failure counts per IP version and protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakdown {
    pub ipv4: usize,
    pub ipv6: usize,
    /// One entry per protocol, in order of first failure.
    pub by_protocol: Tally<String>,
}

impl Breakdown {
    pub fn from_failures(failures: &[FailureRecord]) -> Self {
        let count_version = |version: &str| {
            failures
                .iter()
                .filter(|f| f.ip_version == version)
                .count()
        };

        Self {
            ipv4: count_version("IPv4"),
            ipv6: count_version("IPv6"),
            by_protocol: failures.iter().map(|f| f.protocol.clone()).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Row {
    index: usize,
    host: String,
    target_ip: String,
    ip_version: String,
    protocol: String,
    status: String,
    latency: String,
    server: String,
    error: String,
}

impl From<&FailureRecord> for Row {
    fn from(f: &FailureRecord) -> Self {
        Self {
            index: f.index,
            host: table_cell(&f.host, HOST_WIDTH),
            target_ip: table_cell(&f.target_ip, usize::MAX),
            ip_version: table_cell(&f.ip_version, usize::MAX),
            protocol: table_cell(&f.protocol, usize::MAX),
            status: f
                .status_code
                .map_or_else(|| "N/A".to_string(), |code| code.to_string()),
            latency: f.latency_ms.to_string(),
            server: table_cell(&f.server_header, SERVER_WIDTH),
            error: table_cell(&f.error_msg, ERROR_WIDTH),
        }
    }
}

#[derive(Debug, Serialize)]
struct Count<'a> {
    label: &'a str,
    count: usize,
}

/// Renders the markdown report from an embedded Tera template.
#[derive(Debug)]
pub struct NarrativeRenderer {
    tera: Tera,
}

impl NarrativeRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { tera })
    }

    pub fn render(&self, model: &ReportModel) -> Result<String> {
        let breakdown = Breakdown::from_failures(&model.failures);

        let categories: Vec<Count> = model
            .categories
            .iter()
            .map(|(category, count)| Count {
                label: category.label(),
                count,
            })
            .collect();
        let protocols: Vec<Count> = breakdown
            .by_protocol
            .iter()
            .map(|(protocol, count)| Count {
                label: protocol,
                count,
            })
            .collect();
        let rows: Vec<Row> = model.failures.iter().map(Row::from).collect();

        let generated_at = model
            .run
            .generated_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        let mut context = Context::new();
        context.insert("generated_at", &generated_at);
        context.insert("source_file", &model.run.source_file);
        context.insert("stats", &model.statistics);
        context.insert("failure_rate", &model.statistics.failure_rate_display());
        context.insert("has_failures", &!rows.is_empty());
        context.insert("categories", &categories);
        context.insert("rows", &rows);
        context.insert("ipv4", &breakdown.ipv4);
        context.insert("ipv6", &breakdown.ipv6);
        context.insert("protocols", &protocols);

        let report = self.tera.render(TEMPLATE_NAME, &context)?;
        debug!("Rendered narrative report ({} bytes)", report.len());
        Ok(report)
    }
}
