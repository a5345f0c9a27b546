//! The sequential pipeline: split → normalize → frames → tag → merge →
//! caption → emit.
//!
//! - **paths**: Working-directory layout derived from config
//! - **discovery**: Find stage inputs on disk
//! - **stage**: The `Stage` enum in run order
//! - **stages**: One function per stage
//! - **observer**: Progress callbacks
//! - **runner**: `Pipeline`, which runs a span of stages

pub mod discovery;
pub mod observer;
pub mod paths;
pub mod runner;
pub mod stage;
pub mod stages;

pub use discovery::{DiscoveredFile, FileDiscovery};
pub use observer::{NoopObserver, StageObserver};
pub use paths::WorkPaths;
pub use runner::Pipeline;
pub use stage::Stage;
pub use stages::run_tagger;
