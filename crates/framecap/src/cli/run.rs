//! The `framecap run` and `framecap stage` commands.

use clap::Args;
use framecap_core::{Config, Pipeline, Stage, StageObserver, StageReport};
use indicatif::{ProgressBar, ProgressStyle};

use super::types::StageArg;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// First stage to run
    #[arg(long, value_enum, default_value_t = StageArg::Split)]
    pub from: StageArg,

    /// Last stage to run (inclusive)
    #[arg(long, value_enum, default_value_t = StageArg::Emit)]
    pub to: StageArg,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,
}

/// Arguments for the `stage` command.
#[derive(Args, Debug)]
pub struct StageArgs {
    /// Stage to run
    #[arg(value_enum)]
    pub stage: StageArg,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,
}

/// Execute the run command.
pub fn execute(args: RunArgs, config: &Config) -> anyhow::Result<()> {
    let from = Stage::from(args.from);
    let to = Stage::from(args.to);
    if from > to {
        anyhow::bail!("--from {from} comes after --to {to}");
    }

    let pipeline = Pipeline::new(config)?;
    let mut observer = ProgressObserver::new(!args.no_progress);
    let start = std::time::Instant::now();
    let reports = pipeline.run(from..=to, &mut observer)?;

    print_summary(&reports, start.elapsed());
    Ok(())
}

/// Execute the stage command.
pub fn execute_stage(args: StageArgs, config: &Config) -> anyhow::Result<()> {
    let pipeline = Pipeline::new(config)?;
    let mut observer = ProgressObserver::new(!args.no_progress);
    let start = std::time::Instant::now();
    let report = pipeline.run_one(args.stage.into(), &mut observer)?;

    print_summary(&[report], start.elapsed());
    Ok(())
}

/// Renders one progress bar per stage on stderr.
struct ProgressObserver {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl ProgressObserver {
    fn new(enabled: bool) -> Self {
        Self {
            enabled: enabled && console::Term::stderr().is_term(),
            bar: None,
        }
    }
}

impl StageObserver for ProgressObserver {
    fn stage_started(&mut self, stage: Stage, total: usize) {
        if !self.enabled {
            return;
        }
        let pb = create_progress_bar(total as u64);
        pb.set_message(stage.to_string());
        self.bar = Some(pb);
    }

    fn progress(&mut self, _stage: Stage, done: usize) {
        if let Some(pb) = &self.bar {
            pb.set_position(done as u64);
        }
    }

    fn stage_finished(&mut self, report: &StageReport) {
        if let Some(pb) = self.bar.take() {
            pb.finish_and_clear();
        }
        tracing::debug!("{} finished in {:.1}s", report.stage, report.seconds);
    }
}

impl Drop for ProgressObserver {
    fn drop(&mut self) {
        // Leave a failed stage's bar visible.
        if let Some(pb) = self.bar.take() {
            pb.abandon();
        }
    }
}

/// Create a progress bar for one stage.
fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("##-"));
    }
    pb
}

/// Print a formatted summary table of completed stages.
fn print_summary(reports: &[StageReport], elapsed: std::time::Duration) {
    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    for report in reports {
        eprintln!(
            "    {:<10} {:>8} {:>7.1}s",
            report.stage, report.items, report.seconds
        );
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Duration:  {:>15.1}s", elapsed.as_secs_f64());
    if let Some(last) = reports.last() {
        eprintln!("    Output:    {}", last.output.display());
    }
    eprintln!("  ====================================");
}
