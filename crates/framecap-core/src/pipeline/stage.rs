//! Pipeline stages in run order.

use std::fmt;
use std::str::FromStr;

/// One step of the pipeline. Variants are declared in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Source videos → fixed-length clips
    Split,
    /// Clips → scaled, fixed-fps clips
    Normalize,
    /// Normalized clips → JPEG frames
    Frames,
    /// Frames → automatic tags
    Tag,
    /// All tag sources → one ranked record per image
    Merge,
    /// Merged tags → caption strings
    Caption,
    /// Frames and captions → training dataset
    Emit,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Split,
        Stage::Normalize,
        Stage::Frames,
        Stage::Tag,
        Stage::Merge,
        Stage::Caption,
        Stage::Emit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Split => "split",
            Stage::Normalize => "normalize",
            Stage::Frames => "frames",
            Stage::Tag => "tag",
            Stage::Merge => "merge",
            Stage::Caption => "caption",
            Stage::Emit => "emit",
        }
    }

    /// Whether this stage shells out to ffmpeg.
    pub fn needs_ffmpeg(self) -> bool {
        matches!(self, Stage::Split | Stage::Normalize | Stage::Frames)
    }

    /// Stages from `from` to `to` inclusive, in run order.
    ///
    /// Empty when `from` comes after `to`.
    pub fn span(from: Stage, to: Stage) -> Vec<Stage> {
        Stage::ALL
            .into_iter()
            .filter(|s| *s >= from && *s <= to)
            .collect()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown stage '{s}'"))
    }
}
