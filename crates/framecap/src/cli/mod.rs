//! CLI command implementations.

pub mod config;
pub mod ingest;
pub mod keyword;
pub mod run;
pub mod theme;
pub mod types;
