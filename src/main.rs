use anyhow::{Context, Result};
use clap::Parser;

use probe_report::config::{init_tracing, Config};

fn main() -> Result<()> {
    init_tracing();
    let config = Config::parse();

    probe_report::run(&config)
        .with_context(|| format!("failed to build reports from {}", config.input.display()))?;
    Ok(())
}
