//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Which report files a run writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Markdown report only.
    #[value(alias = "markdown")]
    Narrative,
    /// JSON report only.
    #[value(alias = "json")]
    Structured,
    #[default]
    Both,
}

impl OutputFormat {
    pub fn writes_narrative(self) -> bool {
        matches!(self, OutputFormat::Narrative | OutputFormat::Both)
    }

    pub fn writes_structured(self) -> bool {
        matches!(self, OutputFormat::Structured | OutputFormat::Both)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "probe-report",
    version,
    about = "Summarize failed HTTP/3 connectivity probes into markdown and JSON reports"
)]
pub struct Config {
    /// Connectivity results file (JSON array of probe records).
    #[arg(
        value_name = "INPUT",
        env = "PROBE_REPORT_INPUT",
        default_value = "connectivity_results.json"
    )]
    pub input: PathBuf,

    /// Report formats to write.
    #[arg(
        short,
        long,
        value_enum,
        env = "PROBE_REPORT_FORMAT",
        default_value_t = OutputFormat::Both
    )]
    pub format: OutputFormat,

    /// Directory the report files are written to.
    #[arg(short, long, env = "PROBE_REPORT_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Skip the summary printed to stdout.
    #[arg(long)]
    pub no_summary: bool,
}

/// Installs the stderr log subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second init in the same process (tests) is not an error.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["probe-report"]).unwrap();
        assert_eq!(config.input, PathBuf::from("connectivity_results.json"));
        assert_eq!(config.format, OutputFormat::Both);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(!config.no_summary);
    }

    #[test]
    fn test_format_aliases() {
        let config =
            Config::try_parse_from(["probe-report", "--format", "markdown", "in.json"]).unwrap();
        assert_eq!(config.format, OutputFormat::Narrative);
        assert_eq!(config.input, PathBuf::from("in.json"));

        let config = Config::try_parse_from(["probe-report", "-f", "json"]).unwrap();
        assert_eq!(config.format, OutputFormat::Structured);
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Config::try_parse_from(["probe-report", "--format", "html"]).is_err());
    }

    #[test]
    fn test_format_selection() {
        assert!(OutputFormat::Both.writes_narrative() && OutputFormat::Both.writes_structured());
        assert!(!OutputFormat::Narrative.writes_structured());
        assert!(!OutputFormat::Structured.writes_narrative());
    }
}
