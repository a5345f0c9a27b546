//! CLI enum types mirroring core enums for clap's `ValueEnum`.

use clap::ValueEnum;
use framecap_core::{Source, Stage};

/// Pipeline stage, in run order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StageArg {
    /// Cut source videos into fixed-length clips
    Split,
    /// Scale clips and fix the frame rate
    Normalize,
    /// Extract JPEG frames
    Frames,
    /// Tag frames automatically
    Tag,
    /// Merge all tag sources
    Merge,
    /// Build captions from merged tags
    Caption,
    /// Write the training dataset
    Emit,
}

impl From<StageArg> for Stage {
    fn from(arg: StageArg) -> Self {
        match arg {
            StageArg::Split => Stage::Split,
            StageArg::Normalize => Stage::Normalize,
            StageArg::Frames => Stage::Frames,
            StageArg::Tag => Stage::Tag,
            StageArg::Merge => Stage::Merge,
            StageArg::Caption => Stage::Caption,
            StageArg::Emit => Stage::Emit,
        }
    }
}

/// Human annotation export format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    /// CVAT zip export with captions.json
    Cvat,
    /// VIAME CSV
    Viame,
    /// datagym-core JSON
    Datagym,
}

impl From<SourceArg> for Source {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Cvat => Source::Cvat,
            SourceArg::Viame => Source::Viame,
            SourceArg::Datagym => Source::Datagym,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names_match_core() {
        for arg in StageArg::value_variants() {
            let name = arg.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(Stage::from(*arg).name(), name);
        }
    }

    #[test]
    fn source_names_match_core() {
        for arg in SourceArg::value_variants() {
            let name = arg.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(Source::from(*arg).name(), name);
        }
    }
}
