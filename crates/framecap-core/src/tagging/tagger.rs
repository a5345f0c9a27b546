//! Automatic frame tagging.
//!
//! Model inference lives behind the `Tagger` trait. The bundled `StubTagger`
//! returns a fixed tag list so the pipeline runs end to end without a model;
//! a WD14 ONNX tagger slots in by implementing the same trait.

use std::path::Path;

use crate::error::PipelineResult;
use crate::types::ScoredTag;

/// Produces scored tags for a single frame image.
pub trait Tagger {
    /// Source name; the stage writes `<tags_raw>/<name>.jsonl`.
    fn name(&self) -> &str;

    /// Tag one image.
    fn tag(&self, image: &Path) -> PipelineResult<Vec<ScoredTag>>;
}

/// Placeholder tagger standing in for WD14 inference.
#[derive(Debug, Clone, Default)]
pub struct StubTagger;

impl StubTagger {
    const TAGS: &'static [(&'static str, f64)] =
        &[("outdoor", 0.92), ("landscape", 0.88), ("tree", 0.81)];
}

impl Tagger for StubTagger {
    fn name(&self) -> &str {
        "wd14"
    }

    fn tag(&self, _image: &Path) -> PipelineResult<Vec<ScoredTag>> {
        Ok(Self::TAGS
            .iter()
            .map(|(tag, score)| (tag.to_string(), *score))
            .collect())
    }
}
