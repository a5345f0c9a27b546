//! Pipeline orchestration.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::dataset::emit_dataset;
use crate::error::{PipelineError, PipelineResult, Result};
use crate::ingest::{self, Source};
use crate::media::resolve_ffmpeg;
use crate::tagging::{StubTagger, Tagger};
use crate::types::StageReport;

use super::observer::StageObserver;
use super::paths::{ensure_dir, WorkPaths};
use super::stage::Stage;
use super::stages;

/// Runs stages against a resolved working layout.
///
/// Stages communicate only through files under `WorkPaths`; a failed stage
/// aborts the run and leaves earlier outputs in place.
pub struct Pipeline {
    config: Config,
    paths: WorkPaths,
    tagger: Box<dyn Tagger>,
}

impl Pipeline {
    /// Resolve paths from config; fails if a required path is not set.
    pub fn new(config: &Config) -> Result<Self> {
        let paths = WorkPaths::resolve(config)?;
        Ok(Self {
            config: config.clone(),
            paths,
            tagger: Box::new(StubTagger),
        })
    }

    /// Replace the frame tagger.
    pub fn with_tagger(mut self, tagger: Box<dyn Tagger>) -> Self {
        self.tagger = tagger;
        self
    }

    pub fn paths(&self) -> &WorkPaths {
        &self.paths
    }

    /// Run every stage in `range` in order.
    pub fn run(
        &self,
        range: RangeInclusive<Stage>,
        observer: &mut dyn StageObserver,
    ) -> PipelineResult<Vec<StageReport>> {
        let stages = Stage::span(*range.start(), *range.end());
        tracing::info!(
            "Running {} stage(s): {}",
            stages.len(),
            stages
                .iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
                .join(" → ")
        );

        let ffmpeg = self.prepare(&stages)?;
        let mut reports = Vec::with_capacity(stages.len());
        for stage in stages {
            let report = self.run_stage(stage, ffmpeg.as_deref(), observer)?;
            observer.stage_finished(&report);
            reports.push(report);
        }
        Ok(reports)
    }

    /// Run a single stage.
    pub fn run_one(
        &self,
        stage: Stage,
        observer: &mut dyn StageObserver,
    ) -> PipelineResult<StageReport> {
        let ffmpeg = self.prepare(&[stage])?;
        let report = self.run_stage(stage, ffmpeg.as_deref(), observer)?;
        observer.stage_finished(&report);
        Ok(report)
    }

    /// Convert a human annotation export into a tag source for `merge`.
    pub fn ingest(&self, source: Source, export: &Path) -> PipelineResult<StageReport> {
        ensure_dir(&self.paths.tags_raw)?;
        ingest::ingest(source, export, &self.paths.tags_raw)
    }

    /// Create output directories and locate ffmpeg if any stage needs it.
    fn prepare(&self, stages: &[Stage]) -> PipelineResult<Option<PathBuf>> {
        self.paths.ensure()?;
        if stages.iter().any(|s| s.needs_ffmpeg()) {
            resolve_ffmpeg(&self.config.paths.ffmpeg_bin).map(Some)
        } else {
            Ok(None)
        }
    }

    fn run_stage(
        &self,
        stage: Stage,
        ffmpeg: Option<&Path>,
        observer: &mut dyn StageObserver,
    ) -> PipelineResult<StageReport> {
        let p = &self.paths;
        let c = &self.config;
        let tool = || {
            ffmpeg.ok_or_else(|| PipelineError::ToolNotFound {
                tool: c.paths.ffmpeg_bin.clone(),
            })
        };

        match stage {
            Stage::Split => stages::split_all(tool()?, &p.input_videos, &p.clips, &c.video, observer),
            Stage::Normalize => stages::normalize_all(
                tool()?,
                &p.clips,
                &p.normalized_videos,
                &c.video_norm,
                observer,
            ),
            Stage::Frames => stages::extract_all(
                tool()?,
                &p.normalized_videos,
                &p.frames,
                &c.frame_extract,
                observer,
            ),
            Stage::Tag => stages::run_tagger(self.tagger.as_ref(), &p.frames, &p.tags_raw, observer),
            Stage::Merge => stages::merge_sources(
                &p.tags_raw,
                &p.tags_merged,
                c.merge.min_confidence,
                observer,
            ),
            Stage::Caption => {
                stages::build_captions(&p.tags_merged, &p.captions, &c.caption_config(), observer)
            }
            Stage::Emit => emit_dataset(&p.frames, &p.captions, &p.dataset_root, observer),
        }
    }
}
