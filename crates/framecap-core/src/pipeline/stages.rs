//! Stage implementations. Each reads the previous stage's persisted output
//! in full and writes its own.

use std::io;
use std::path::Path;
use std::time::Instant;

use crate::config::{FrameExtractConfig, VideoConfig, VideoNormConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::ingest::IngestedRecord;
use crate::media::video::normalized_name;
use crate::media::{extract_frames, normalize_video, split_video};
use crate::output::{read_jsonl, write_jsonl, JsonlWriter};
use crate::tagging::{build_caption, CaptionConfig, TagMerger, Tagger};
use crate::types::{CaptionRecord, StageReport, TagRecord};

use super::discovery::FileDiscovery;
use super::observer::StageObserver;
use super::stage::Stage;

fn report(stage: Stage, items: usize, output: &Path, start: Instant) -> StageReport {
    StageReport {
        stage: stage.to_string(),
        items,
        output: output.to_path_buf(),
        seconds: start.elapsed().as_secs_f64(),
    }
}

/// Split every source video in `input` into `<clips>/<video>/clip_NNNN.mp4`.
pub fn split_all(
    ffmpeg: &Path,
    input: &Path,
    clips: &Path,
    video: &VideoConfig,
    observer: &mut dyn StageObserver,
) -> PipelineResult<StageReport> {
    let start = Instant::now();
    if !input.is_dir() {
        return Err(PipelineError::io(
            input,
            io::Error::new(io::ErrorKind::NotFound, "input directory not found"),
        ));
    }

    let videos = FileDiscovery::videos().discover(input);
    if videos.is_empty() {
        tracing::warn!("No videos found in {}", input.display());
    } else {
        tracing::debug!(
            "[split] {} video(s), {:.1} MB",
            videos.len(),
            FileDiscovery::total_size(&videos) as f64 / 1_000_000.0
        );
    }
    observer.stage_started(Stage::Split, videos.len());

    for (i, src) in videos.iter().enumerate() {
        let dst = clips.join(src.stem());
        tracing::debug!("[split] {} -> {}", src.path.display(), dst.display());
        split_video(ffmpeg, &src.path, &dst, video)?;
        observer.progress(Stage::Split, i + 1);
    }

    let items = FileDiscovery::clips().discover(clips).len();
    tracing::info!(
        "[split] {} video(s) -> {} clip(s) in {}",
        videos.len(),
        items,
        clips.display()
    );
    Ok(report(Stage::Split, items, clips, start))
}

/// Normalize every clip into `<normalized>/<video>_<clip>_norm.mp4`.
pub fn normalize_all(
    ffmpeg: &Path,
    clips: &Path,
    normalized: &Path,
    norm: &VideoNormConfig,
    observer: &mut dyn StageObserver,
) -> PipelineResult<StageReport> {
    let start = Instant::now();
    let sources = FileDiscovery::clips().discover(clips);
    observer.stage_started(Stage::Normalize, sources.len());

    for (i, clip) in sources.iter().enumerate() {
        let dst = normalized.join(normalized_name(&clip.parent_name(), &clip.path));
        tracing::debug!("[normalize] {} -> {}", clip.path.display(), dst.display());
        normalize_video(ffmpeg, &clip.path, &dst, norm)?;
        observer.progress(Stage::Normalize, i + 1);
    }

    tracing::info!(
        "[normalize] {} clip(s) -> {}",
        sources.len(),
        normalized.display()
    );
    Ok(report(Stage::Normalize, sources.len(), normalized, start))
}

/// Dump frames of every normalized clip into `<frames>/<stem>/`.
pub fn extract_all(
    ffmpeg: &Path,
    normalized: &Path,
    frames: &Path,
    extract: &FrameExtractConfig,
    observer: &mut dyn StageObserver,
) -> PipelineResult<StageReport> {
    let start = Instant::now();
    let sources = FileDiscovery::normalized().discover(normalized);
    observer.stage_started(Stage::Frames, sources.len());

    for (i, clip) in sources.iter().enumerate() {
        let dst = frames.join(clip.stem());
        tracing::debug!("[frames] {} -> {}", clip.path.display(), dst.display());
        extract_frames(ffmpeg, &clip.path, &dst, extract)?;
        observer.progress(Stage::Frames, i + 1);
    }

    let items = FileDiscovery::frames().discover(frames).len();
    tracing::info!("[frames] {} frame(s) in {}", items, frames.display());
    Ok(report(Stage::Frames, items, frames, start))
}

/// Tag every `<frames>/*/*.jpg` and write `<tags_raw>/<tagger>.jsonl`.
///
/// The record's image is the frame path as discovered.
pub fn run_tagger(
    tagger: &dyn Tagger,
    frames: &Path,
    tags_raw: &Path,
    observer: &mut dyn StageObserver,
) -> PipelineResult<StageReport> {
    let start = Instant::now();
    let images = FileDiscovery::frames().discover(frames);
    observer.stage_started(Stage::Tag, images.len());

    let output = tags_raw.join(format!("{}.jsonl", tagger.name()));
    let mut writer = JsonlWriter::create(&output)?;
    for (i, image) in images.iter().enumerate() {
        let tags = tagger.tag(&image.path).map_err(|e| match e {
            PipelineError::Tagging { .. } => e,
            other => PipelineError::Tagging {
                path: image.path.clone(),
                message: other.to_string(),
            },
        })?;
        let record = IngestedRecord::Wd14 {
            image: image.path.to_string_lossy().into_owned(),
            tags,
        }
        .into_tag_record();
        writer
            .write(&record)
            .map_err(|e| PipelineError::io(&output, e))?;
        observer.progress(Stage::Tag, i + 1);
    }
    writer.flush().map_err(|e| PipelineError::io(&output, e))?;

    let items = writer.items_written();
    tracing::info!("[{}] wrote {} record(s) to {}", tagger.name(), items, output.display());
    Ok(report(Stage::Tag, items, &output, start))
}

/// Merge every `<tags_raw>/*.jsonl` (in file-name order) into `merged`.
pub fn merge_sources(
    tags_raw: &Path,
    merged: &Path,
    min_confidence: f64,
    observer: &mut dyn StageObserver,
) -> PipelineResult<StageReport> {
    let start = Instant::now();
    let sources = FileDiscovery::new(&["jsonl"], 1).discover(tags_raw);
    if sources.is_empty() {
        tracing::warn!("No tag sources in {}", tags_raw.display());
    }
    observer.stage_started(Stage::Merge, sources.len());

    let mut merger = TagMerger::new(min_confidence);
    for (i, source) in sources.iter().enumerate() {
        let records: Vec<TagRecord> = read_jsonl(&source.path)?;
        tracing::debug!(
            "[merge] {} record(s) from {}",
            records.len(),
            source.path.display()
        );
        merger.extend(&records);
        observer.progress(Stage::Merge, i + 1);
    }

    let records: Vec<TagRecord> = merger.finish().iter().map(|e| e.to_record()).collect();
    let items = write_jsonl(merged, &records)?;
    tracing::info!(
        "[merge] {} source(s), {} image(s) -> {}",
        sources.len(),
        items,
        merged.display()
    );
    Ok(report(Stage::Merge, items, merged, start))
}

/// Build one caption per merged record.
pub fn build_captions(
    merged: &Path,
    captions: &Path,
    config: &CaptionConfig,
    observer: &mut dyn StageObserver,
) -> PipelineResult<StageReport> {
    let start = Instant::now();
    let records: Vec<TagRecord> = read_jsonl(merged)?;
    observer.stage_started(Stage::Caption, records.len());

    let mut rows = Vec::with_capacity(records.len());
    for (i, record) in records.into_iter().enumerate() {
        let caption = build_caption(&record.tags, config);
        rows.push(CaptionRecord {
            image: record.image,
            caption,
        });
        observer.progress(Stage::Caption, i + 1);
    }

    let items = write_jsonl(captions, &rows)?;
    tracing::info!("[caption] wrote {} caption(s) to {}", items, captions.display());
    Ok(report(Stage::Caption, items, captions, start))
}
