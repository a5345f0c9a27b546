//! Canonical locations of every stage's inputs and outputs.

use std::path::{Path, PathBuf};

use crate::config::{expand_path, Config};
use crate::error::{ConfigError, PipelineError, PipelineResult};

/// Paths derived from `[paths]` and `[musubi]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkPaths {
    pub input_videos: PathBuf,
    pub work_root: PathBuf,
    /// `<work>/clips/<video>/clip_NNNN.mp4`
    pub clips: PathBuf,
    /// `<work>/normalized_videos/<video>_<clip>_norm.mp4`
    pub normalized_videos: PathBuf,
    /// `<work>/frames/<stem>/frame_NNNNNN.jpg`
    pub frames: PathBuf,
    /// One JSONL file per tag source
    pub tags_raw: PathBuf,
    /// `<work>/tags_merged/merged.jsonl`
    pub tags_merged: PathBuf,
    /// `<work>/captions_clean.jsonl`
    pub captions: PathBuf,
    pub dataset_root: PathBuf,
}

impl WorkPaths {
    /// Compute all paths, failing if a required key is absent.
    pub fn resolve(config: &Config) -> Result<Self, ConfigError> {
        let required = |value: &Option<PathBuf>, key: &str| {
            value
                .as_deref()
                .map(expand_path)
                .ok_or_else(|| ConfigError::Missing(key.to_string()))
        };

        let input_videos = required(&config.paths.input_videos, "paths.input_videos")?;
        let work_root = required(&config.paths.work_root, "paths.work_root")?;
        let dataset_root = required(&config.musubi.dataset_root, "musubi.dataset_root")?;

        Ok(Self::under(input_videos, work_root, dataset_root))
    }

    fn under(input_videos: PathBuf, work_root: PathBuf, dataset_root: PathBuf) -> Self {
        Self {
            clips: work_root.join("clips"),
            normalized_videos: work_root.join("normalized_videos"),
            frames: work_root.join("frames"),
            tags_raw: work_root.join("tags_raw"),
            tags_merged: work_root.join("tags_merged").join("merged.jsonl"),
            captions: work_root.join("captions_clean.jsonl"),
            input_videos,
            work_root,
            dataset_root,
        }
    }

    /// Create every output directory. The input directory is left alone.
    pub fn ensure(&self) -> PipelineResult<()> {
        let merged_dir = self.tags_merged.parent().unwrap_or(&self.work_root);
        let dirs: [&Path; 7] = [
            &self.work_root,
            &self.clips,
            &self.normalized_videos,
            &self.frames,
            &self.tags_raw,
            merged_dir,
            &self.dataset_root,
        ];
        for dir in dirs {
            ensure_dir(dir)?;
        }
        Ok(())
    }
}

pub(crate) fn ensure_dir(dir: &Path) -> PipelineResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_layout() {
        let paths = WorkPaths::resolve(&Config::starter()).unwrap();
        assert_eq!(paths.clips, PathBuf::from("work/clips"));
        assert_eq!(
            paths.tags_merged,
            PathBuf::from("work/tags_merged/merged.jsonl")
        );
        assert_eq!(paths.captions, PathBuf::from("work/captions_clean.jsonl"));
        assert_eq!(paths.dataset_root, PathBuf::from("dataset"));
    }

    #[test]
    fn test_missing_work_root() {
        let mut config = Config::starter();
        config.paths.work_root = None;
        let err = WorkPaths::resolve(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(key) if key == "paths.work_root"));
    }

    #[test]
    fn test_missing_dataset_root() {
        let mut config = Config::starter();
        config.musubi.dataset_root = None;
        let err = WorkPaths::resolve(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(key) if key == "musubi.dataset_root"));
    }

    #[test]
    fn test_ensure_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let paths = WorkPaths::under(
            dir.path().join("in"),
            dir.path().join("work"),
            dir.path().join("dataset"),
        );
        paths.ensure().unwrap();
        assert!(paths.frames.is_dir());
        assert!(paths.tags_merged.parent().unwrap().is_dir());
        assert!(paths.dataset_root.is_dir());
        assert!(!paths.input_videos.exists());
    }
}
