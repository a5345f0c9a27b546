//! Sub-configuration structs with pipeline defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Input, work and tool locations.
///
/// `input_videos` and `work_root` have no default: a run without them fails
/// before any stage starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the raw review videos
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_videos: Option<PathBuf>,

    /// Root for all intermediate stage outputs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_root: Option<PathBuf>,

    /// ffmpeg executable (bare name is looked up on PATH)
    pub ffmpeg_bin: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_videos: None,
            work_root: None,
            ffmpeg_bin: "ffmpeg".to_string(),
        }
    }
}

/// Clip splitting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Maximum clip length in seconds
    pub clip_max_seconds: u32,

    /// Frame rate clips are re-encoded at
    pub fps: u32,

    /// Stream-copy segments instead of re-encoding (keeps source fps)
    pub split_fast_copy: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            clip_max_seconds: 5,
            fps: 60,
            split_fast_copy: false,
        }
    }
}

/// Resolution and frame-rate normalization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoNormConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub pix_fmt: String,

    /// x264 constant rate factor (0-51, lower is better)
    pub crf: u8,

    /// x264 preset
    pub preset: String,
}

impl Default for VideoNormConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 16,
            pix_fmt: "yuv420p".to_string(),
            crf: 15,
            preset: "slow".to_string(),
        }
    }
}

/// Frame extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameExtractConfig {
    /// JPEG quality (1-100), mapped onto ffmpeg's qscale
    pub jpeg_q: u8,
}

impl Default for FrameExtractConfig {
    fn default() -> Self {
        Self { jpeg_q: 95 }
    }
}

/// Tag merge settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Tag/score pairs below this confidence are discarded before merging.
    pub min_confidence: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.35,
        }
    }
}

/// Caption cleanup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Casefold every tag
    pub lowercase: bool,

    /// Render `_` as a space
    pub replace_underscores: bool,

    /// Drop tags on the fixed NSFW blocklist
    pub strip_nsfb_tags: bool,

    /// Hard cap on tags per caption
    pub max_tags: usize,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            replace_underscores: true,
            strip_nsfb_tags: true,
            max_tags: 64,
        }
    }
}

/// Musubi-tuner dataset settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MusubiConfig {
    /// Output dataset directory (required)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_root: Option<PathBuf>,

    /// Activation keyword prepended to every caption
    pub caption_prefix: String,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
