//! The `framecap ingest` command.

use std::path::PathBuf;

use clap::Args;
use framecap_core::{Config, Pipeline, Source};

use super::types::SourceArg;

/// Arguments for the `ingest` command.
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Export format
    #[arg(value_enum)]
    pub source: SourceArg,

    /// Export file (.zip for CVAT, .csv for VIAME, .json for datagym)
    #[arg(long, short)]
    pub export: PathBuf,
}

/// Execute the ingest command.
pub fn execute(args: IngestArgs, config: &Config) -> anyhow::Result<()> {
    if !args.export.is_file() {
        anyhow::bail!("Export file not found: {}", args.export.display());
    }

    let pipeline = Pipeline::new(config)?;
    let source = Source::from(args.source);
    let report = pipeline.ingest(source, &args.export)?;

    println!(
        "[{}] {} record(s) -> {}",
        source,
        report.items,
        report.output.display()
    );
    Ok(())
}
