//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

/// Upper bound for `video.fps` and `video_norm.fps`.
const MAX_FPS: u32 = 1000;
/// Upper bound for `video.clip_max_seconds` (one day).
const MAX_CLIP_SECONDS: u32 = 86_400;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    ///
    /// Required paths are not checked here; see `WorkPaths::resolve`.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.merge.min_confidence) {
            return Err(ConfigError::ValidationError(
                "merge.min_confidence must be between 0.0 and 1.0".into(),
            ));
        }
        if !(1..=MAX_CLIP_SECONDS).contains(&self.video.clip_max_seconds) {
            return Err(ConfigError::ValidationError(format!(
                "video.clip_max_seconds must be between 1 and {MAX_CLIP_SECONDS}"
            )));
        }
        if !(1..=MAX_FPS).contains(&self.video.fps) {
            return Err(ConfigError::ValidationError(format!(
                "video.fps must be between 1 and {MAX_FPS}"
            )));
        }
        if self.video_norm.width == 0 || self.video_norm.height == 0 {
            return Err(ConfigError::ValidationError(
                "video_norm.width and video_norm.height must be > 0".into(),
            ));
        }
        if !(1..=MAX_FPS).contains(&self.video_norm.fps) {
            return Err(ConfigError::ValidationError(format!(
                "video_norm.fps must be between 1 and {MAX_FPS}"
            )));
        }
        if self.video_norm.crf > 51 {
            return Err(ConfigError::ValidationError(
                "video_norm.crf must be between 0 and 51".into(),
            ));
        }
        if !(1..=100).contains(&self.frame_extract.jpeg_q) {
            return Err(ConfigError::ValidationError(
                "frame_extract.jpeg_q must be between 1 and 100".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}
