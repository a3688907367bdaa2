//! Short summary printed to the terminal after a run.

use std::fmt::{self, Write};

use itertools::Itertools;

use crate::analysis::ReportModel;
use crate::classify::ErrorCategory;

const TOP_CATEGORIES: usize = 5;
const RULE_WIDTH: usize = 50;

/// The most frequent categories, highest count first.
///
/// Equal counts keep the order in which the categories first appeared.
pub fn top_categories(model: &ReportModel, limit: usize) -> Vec<(ErrorCategory, usize)> {
    model
        .categories
        .iter()
        .map(|(category, count)| (*category, count))
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .take(limit)
        .collect()
}

pub fn render(model: &ReportModel) -> String {
    let mut out = String::new();
    write_summary(&mut out, model).expect("formatting into a String never fails");
    out
}

fn write_summary(out: &mut impl Write, model: &ReportModel) -> fmt::Result {
    let stats = &model.statistics;
    let rule = "=".repeat(RULE_WIDTH);

    writeln!(out, "\n{rule}")?;
    writeln!(out, "HTTP/3 connectivity failure summary")?;
    writeln!(out, "{rule}")?;
    writeln!(out, "Total tests:      {}", stats.total)?;
    writeln!(
        out,
        "Failed tests:     {} ({}%)",
        stats.failed,
        stats.failure_rate_display()
    )?;
    writeln!(out, "Successful tests: {}", stats.success)?;

    if !model.failures.is_empty() {
        writeln!(out, "\nTop failure causes:")?;
        for (category, count) in top_categories(model, TOP_CATEGORIES) {
            writeln!(out, "  - {category}: {count}")?;
        }
    }

    writeln!(out, "{rule}")
}
