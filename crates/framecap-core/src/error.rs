//! Error types for the framecap pipeline.
//!
//! Errors are organized by concern so the operator sees which file, stage or
//! config key needs fixing before the run is retried. Nothing here is retried
//! automatically: every error is terminal for the current run.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for framecap operations.
#[derive(Error, Debug)]
pub enum FramecapError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline stage errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// A required option is absent
    #[error("Missing required option: {0}")]
    Missing(String),
}

/// Stage errors raised while the pipeline runs.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A JSON-lines record is missing fields or has a wrong-shaped tag list
    #[error("Malformed record in {source_file}:{line}: {message}")]
    MalformedRecord {
        source_file: PathBuf,
        line: usize,
        message: String,
    },

    /// A path could not be read or written
    #[error("IO failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external tool is not installed or not on PATH
    #[error("{tool} not found (set paths.ffmpeg_bin or add it to PATH)")]
    ToolNotFound { tool: String },

    /// An external tool exited unsuccessfully
    #[error("{tool} failed on {input} (exit code {exit_code:?})")]
    ToolFailed {
        tool: String,
        input: PathBuf,
        exit_code: Option<i32>,
    },

    /// An annotation export could not be read by its adapter
    #[error("Cannot read export {path}: {message}")]
    Export { path: PathBuf, message: String },

    /// The tagger failed on a frame
    #[error("Tagging failed for {path}: {message}")]
    Tagging { path: PathBuf, message: String },
}

impl PipelineError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience type alias for framecap results.
pub type Result<T> = std::result::Result<T, FramecapError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
