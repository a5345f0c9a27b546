//! Progress callbacks for long-running stages.

use crate::types::StageReport;

use super::stage::Stage;

/// Receives progress from the pipeline as it runs.
///
/// All methods default to no-ops so implementors override only what they
/// render.
pub trait StageObserver {
    /// A stage is about to process `total` items.
    fn stage_started(&mut self, _stage: Stage, _total: usize) {}

    /// One more item of the current stage is done.
    fn progress(&mut self, _stage: Stage, _done: usize) {}

    /// A stage completed successfully.
    fn stage_finished(&mut self, _report: &StageReport) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StageObserver for NoopObserver {}

/// Records every callback; used by tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingObserver {
    pub started: Vec<(Stage, usize)>,
    pub ticks: usize,
    pub finished: Vec<String>,
}

#[cfg(test)]
impl StageObserver for RecordingObserver {
    fn stage_started(&mut self, stage: Stage, total: usize) {
        self.started.push((stage, total));
    }

    fn progress(&mut self, _stage: Stage, _done: usize) {
        self.ticks += 1;
    }

    fn stage_finished(&mut self, report: &StageReport) {
        self.finished.push(report.stage.clone());
    }
}
