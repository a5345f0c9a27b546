//! framecap core - turns review videos into a captioned image dataset.
//!
//! Every stage is synchronous and persists its output before the next one
//! starts:
//!
//! ```text
//! videos → split → normalize → frames → tag ─┐
//!                     human exports → ingest ┴→ merge → caption → emit
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use framecap_core::{Config, NoopObserver, Pipeline, Stage};
//!
//! fn main() -> framecap_core::Result<()> {
//!     let config = Config::load()?;
//!     let pipeline = Pipeline::new(&config)?;
//!
//!     for report in pipeline.run(Stage::Merge..=Stage::Emit, &mut NoopObserver)? {
//!         println!("{}: {} item(s)", report.stage, report.items);
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod dataset;
pub mod error;
pub mod ingest;
pub mod media;
pub mod output;
pub mod pipeline;
pub mod tagging;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, FramecapError, PipelineError, PipelineResult, Result};
pub use ingest::{IngestedRecord, Source};
pub use output::{read_jsonl, write_jsonl, JsonlWriter};
pub use pipeline::{NoopObserver, Pipeline, Stage, StageObserver, WorkPaths};
pub use tagging::{build_caption, merge, normalize, CaptionConfig, MergedEntry, TagMerger};
pub use types::{CaptionRecord, ScoredTag, StageReport, TagRecord};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
