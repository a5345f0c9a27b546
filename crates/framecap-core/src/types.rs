//! Core record types exchanged between pipeline stages.
//!
//! Every intermediate file is JSON lines, one of these records per line.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A tag with its confidence, encoded on the wire as `["tag", 0.93]`.
pub type ScoredTag = (String, f64);

/// Tags asserted about one image by one source.
///
/// Both the per-source files under `tags_raw/` and the merged file use this
/// shape; in the merged file tags are canonical and in ranked order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    /// Image identifier, compared verbatim across sources
    pub image: String,

    /// Tag/score pairs in source order
    pub tags: Vec<ScoredTag>,
}

impl TagRecord {
    pub fn new(image: impl Into<String>, tags: Vec<ScoredTag>) -> Self {
        Self {
            image: image.into(),
            tags,
        }
    }
}

/// The caption produced for one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionRecord {
    pub image: String,
    pub caption: String,
}

/// Summary of one completed stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    /// Stage name as used on the command line
    pub stage: String,

    /// Number of items the stage produced (clips, frames, records, lines)
    pub items: usize,

    /// The file or directory the stage wrote
    pub output: PathBuf,

    /// Wall-clock time in seconds
    pub seconds: f64,
}
