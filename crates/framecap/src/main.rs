//! framecap CLI - turn review videos into a captioned image dataset.
//!
//! # Usage
//!
//! ```bash
//! # Run the whole pipeline
//! framecap run
//!
//! # Re-caption after ingesting a CVAT export
//! framecap ingest cvat --export annotations.zip
//! framecap run --from merge
//!
//! # Set the activation keyword
//! framecap keyword mystyle
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use framecap_core::Config;

mod cli;
mod logging;

/// framecap - video-to-caption dataset pipeline.
#[derive(Parser, Debug)]
#[command(name = "framecap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (default: ./framecap.toml, then the platform config dir)
    #[arg(short, long, global = true, env = "FRAMECAP_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the pipeline, or a span of it
    Run(cli::run::RunArgs),

    /// Run a single stage
    Stage(cli::run::StageArgs),

    /// Convert a human annotation export into a tag source
    Ingest(cli::ingest::IngestArgs),

    /// Set the activation keyword prepended to every caption
    Keyword(cli::keyword::KeywordArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

impl Commands {
    /// Config subcommands must work even when the file is broken.
    fn tolerates_bad_config(&self) -> bool {
        matches!(self, Commands::Config(_))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) if cli.command.tolerates_bad_config() => {
            eprintln!("Warning: Failed to load config: {e}\n  Using default configuration.");
            Config::default()
        }
        Err(e) => return Err(e.into()),
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("framecap v{}", framecap_core::VERSION);

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Run(args) => cli::run::execute(args, &config),
        Commands::Stage(args) => cli::run::execute_stage(args, &config),
        Commands::Ingest(args) => cli::ingest::execute(args, &config),
        Commands::Keyword(args) => cli::keyword::execute(args, config_path),
        Commands::Config(args) => cli::config::execute(args, &config, config_path),
    }
}
