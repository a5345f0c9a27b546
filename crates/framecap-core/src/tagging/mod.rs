//! Tag handling: canonical keys, frame tagging, multi-source merging and
//! caption assembly.
//!
//! ```text
//! tagger / ingest → TagRecord* → TagMerger → ranked tags → build_caption
//! ```

pub mod caption;
pub mod merge;
pub mod normalize;
pub mod tagger;

pub use caption::{build_caption, CaptionConfig, NSFB_TAGS};
pub use merge::{merge, MergedEntry, TagMerger};
pub use normalize::normalize;
pub use tagger::{StubTagger, Tagger};
