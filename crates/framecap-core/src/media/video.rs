//! Clip splitting, normalization and frame extraction via ffmpeg.
//!
//! These are thin wrappers: each builds one ffmpeg command from config and
//! blocks until it exits.

use std::path::{Path, PathBuf};

use crate::config::{FrameExtractConfig, VideoConfig, VideoNormConfig};
use crate::error::{PipelineError, PipelineResult};

use super::command::FfmpegCommand;

/// Segment file pattern inside a video's clip directory.
pub const CLIP_PATTERN: &str = "clip_%04d.mp4";
/// Frame file pattern inside a clip's frame directory.
pub const FRAME_PATTERN: &str = "frame_%06d.jpg";

/// Build the split command for one source video.
///
/// Re-encodes at `video.fps` with a keyframe forced every segment boundary,
/// unless `split_fast_copy` is set, in which case streams are copied and the
/// source frame rate is kept.
pub fn split_command(src: &Path, dst_dir: &Path, video: &VideoConfig) -> FfmpegCommand {
    let secs = video.clip_max_seconds;
    let cmd = FfmpegCommand::new(src, dst_dir.join(CLIP_PATTERN));

    let cmd = if video.split_fast_copy {
        cmd.output_args(["-c", "copy", "-map", "0"])
    } else {
        let gop = video.fps.saturating_mul(secs).max(1).to_string();
        cmd.no_audio()
            .output_arg("-r")
            .output_arg(video.fps.to_string())
            .video_codec("libx264")
            .preset("veryfast")
            .crf(18)
            .pix_fmt("yuv420p")
            .output_args(["-profile:v", "high"])
            .output_args(["-g", gop.as_str(), "-keyint_min", gop.as_str()])
            .output_args(["-sc_threshold", "0"])
            .output_arg("-force_key_frames")
            .output_arg(format!("expr:gte(t,n_forced*{secs})"))
    };

    let cmd = cmd
        .output_args(["-f", "segment", "-segment_time"])
        .output_arg(secs.to_string())
        .output_args(["-reset_timestamps", "1"]);

    if video.split_fast_copy {
        cmd
    } else {
        cmd.output_args(["-movflags", "+faststart"])
    }
}

/// Build the normalization command: lanczos scale, fixed fps, no audio.
pub fn normalize_command(src: &Path, dst: &Path, norm: &VideoNormConfig) -> FfmpegCommand {
    FfmpegCommand::new(src, dst)
        .video_filter(format!(
            "scale={}:{}:flags=lanczos,fps={}",
            norm.width, norm.height, norm.fps
        ))
        .pix_fmt(norm.pix_fmt.clone())
        .video_codec("libx264")
        .preset(norm.preset.clone())
        .crf(norm.crf)
        .no_audio()
}

/// Map JPEG quality (1-100) onto ffmpeg's qscale (2 best, 31 worst).
pub fn jpeg_qscale(jpeg_q: u8) -> u32 {
    31u32.saturating_sub(u32::from(jpeg_q) / 3).max(2)
}

/// Build the frame dump command. The input is already at the target fps.
pub fn extract_command(src: &Path, dst_dir: &Path, frames: &FrameExtractConfig) -> FfmpegCommand {
    FfmpegCommand::new(src, dst_dir.join(FRAME_PATTERN))
        .output_arg("-qscale:v")
        .output_arg(jpeg_qscale(frames.jpeg_q).to_string())
}

/// Split one video into `<dst_dir>/clip_NNNN.mp4`.
pub fn split_video(
    ffmpeg: &Path,
    src: &Path,
    dst_dir: &Path,
    video: &VideoConfig,
) -> PipelineResult<()> {
    create_dir(dst_dir)?;
    split_command(src, dst_dir, video).run(ffmpeg)
}

/// Normalize one clip into `dst`.
pub fn normalize_video(
    ffmpeg: &Path,
    src: &Path,
    dst: &Path,
    norm: &VideoNormConfig,
) -> PipelineResult<()> {
    if let Some(parent) = dst.parent() {
        create_dir(parent)?;
    }
    normalize_command(src, dst, norm).run(ffmpeg)
}

/// Dump every frame of one normalized clip into `<dst_dir>/frame_NNNNNN.jpg`.
pub fn extract_frames(
    ffmpeg: &Path,
    src: &Path,
    dst_dir: &Path,
    frames: &FrameExtractConfig,
) -> PipelineResult<()> {
    create_dir(dst_dir)?;
    extract_command(src, dst_dir, frames).run(ffmpeg)
}

/// File name for a normalized clip: `<video>_<clip>_norm.mp4`.
pub fn normalized_name(video: &str, clip: &Path) -> PathBuf {
    let clip_stem = clip
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(format!("{video}_{clip_stem}_norm.mp4"))
}

fn create_dir(dir: &Path) -> PipelineResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))
}
