//! Configuration management for framecap.
//!
//! Configuration is read from `./framecap.toml` when present, otherwise from
//! the platform config directory, with defaults for every optional key. The
//! binary builds one `Config` and hands it by reference to each stage.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use crate::tagging::CaptionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory before the platform path.
pub const LOCAL_CONFIG_FILE: &str = "framecap.toml";

/// Root configuration structure for framecap.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input, work and tool locations
    pub paths: PathsConfig,

    /// Clip splitting
    pub video: VideoConfig,

    /// Resolution / frame-rate normalization
    pub video_norm: VideoNormConfig,

    /// Frame extraction
    pub frame_extract: FrameExtractConfig,

    /// Tag merging
    pub merge: MergeConfig,

    /// Caption cleanup
    pub clean: CleanConfig,

    /// Dataset output and activation keyword
    pub musubi: MusubiConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the first existing candidate path.
    ///
    /// Returns default configuration if no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::locate() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The config file that `load()` would read, if any exists.
    pub fn locate() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        let global = Self::default_path();
        global.is_file().then_some(global)
    }

    /// Get the platform config file path.
    ///
    /// - macOS: ~/Library/Application Support/com.framecap.framecap/config.toml
    /// - Linux: ~/.config/framecap/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\framecap\config\config.toml
    ///
    /// Falls back to ~/.framecap/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "framecap", "framecap")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".framecap").join("config.toml")
            })
    }

    /// Defaults plus conventional values for the required paths.
    ///
    /// This is what `framecap config init` writes.
    pub fn starter() -> Self {
        let mut config = Self::default();
        config.paths.input_videos = Some(PathBuf::from("data/input_videos"));
        config.paths.work_root = Some(PathBuf::from("work"));
        config.musubi.dataset_root = Some(PathBuf::from("dataset"));
        config
    }

    /// Caption-building options drawn from `[clean]` and `[musubi]`.
    pub fn caption_config(&self) -> CaptionConfig {
        CaptionConfig {
            lowercase: self.clean.lowercase,
            replace_underscores: self.clean.replace_underscores,
            strip_nsfb: self.clean.strip_nsfb_tags,
            max_tags: self.clean.max_tags,
            prefix: self.musubi.caption_prefix.clone(),
        }
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Expand a leading `~` in a configured path.
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}
