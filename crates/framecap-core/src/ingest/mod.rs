//! Ingestion adapters for tag sources.
//!
//! Every source format is read into an `IngestedRecord` variant and turned
//! into a uniform `TagRecord` straight away, so the merger never needs to
//! know where a tag came from. Each source writes `<tags_raw>/<name>.jsonl`.

mod cvat;
mod datagym;
mod viame;

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use crate::error::PipelineResult;
use crate::output::write_jsonl;
use crate::tagging::normalize;
use crate::types::{ScoredTag, StageReport, TagRecord};

/// Confidence assigned to human-annotated CVAT tags.
pub const CVAT_SCORE: f64 = 0.99;
/// Confidence assigned to VIAME class/attribute tags.
pub const VIAME_SCORE: f64 = 0.95;
/// Confidence assigned to datagym labels.
pub const DATAGYM_SCORE: f64 = 0.97;

/// One image's tags as read from a specific source format.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestedRecord {
    /// Automatic tagger output, already scored
    Wd14 { image: String, tags: Vec<ScoredTag> },

    /// CVAT caption export; tags unioned across archive members
    Cvat { image: String, tags: BTreeSet<String> },

    /// VIAME CSV row; labels from the class and attributes columns
    Viame { image: String, labels: Vec<String> },

    /// datagym JSON item
    Datagym { image: String, labels: Vec<String> },
}

impl IngestedRecord {
    pub fn image(&self) -> &str {
        match self {
            Self::Wd14 { image, .. }
            | Self::Cvat { image, .. }
            | Self::Viame { image, .. }
            | Self::Datagym { image, .. } => image,
        }
    }

    /// Convert into the uniform record consumed by the merger.
    pub fn into_tag_record(self) -> TagRecord {
        match self {
            Self::Wd14 { image, tags } => TagRecord::new(image, tags),
            Self::Cvat { image, tags } => TagRecord::new(
                image,
                tags.into_iter().map(|t| (t, CVAT_SCORE)).collect(),
            ),
            Self::Viame { image, labels } => {
                TagRecord::new(image, scored_labels(&labels, VIAME_SCORE))
            }
            Self::Datagym { image, labels } => {
                TagRecord::new(image, scored_labels(&labels, DATAGYM_SCORE))
            }
        }
    }
}

/// Normalize labels, drop empties, attach a fixed score.
fn scored_labels(labels: &[String], score: f64) -> Vec<ScoredTag> {
    labels
        .iter()
        .map(|l| normalize(l))
        .filter(|t| !t.is_empty())
        .map(|t| (t, score))
        .collect()
}

/// Human annotation export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// CVAT `.zip` export containing `captions.json`
    Cvat,
    /// VIAME CSV
    Viame,
    /// datagym-core JSON
    Datagym,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Cvat, Source::Viame, Source::Datagym];

    pub fn name(self) -> &'static str {
        match self {
            Source::Cvat => "cvat",
            Source::Viame => "viame",
            Source::Datagym => "datagym",
        }
    }

    /// Read an export file into records.
    pub fn read(self, export: &Path) -> PipelineResult<Vec<IngestedRecord>> {
        match self {
            Source::Cvat => cvat::read(export),
            Source::Viame => viame::read(export),
            Source::Datagym => datagym::read(export),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|src| src.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown source '{s}' (expected cvat, viame or datagym)"))
    }
}

/// Convert an export into `<tags_raw>/<source>.jsonl`.
pub fn ingest(source: Source, export: &Path, tags_raw: &Path) -> PipelineResult<StageReport> {
    let start = Instant::now();
    let records: Vec<TagRecord> = source
        .read(export)?
        .into_iter()
        .map(IngestedRecord::into_tag_record)
        .collect();

    let output = tags_raw.join(format!("{}.jsonl", source.name()));
    let items = write_jsonl(&output, &records)?;
    tracing::info!("[{}] wrote {} record(s) to {}", source, items, output.display());

    Ok(StageReport {
        stage: format!("ingest-{source}"),
        items,
        output,
        seconds: start.elapsed().as_secs_f64(),
    })
}
