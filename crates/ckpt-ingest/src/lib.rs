//! Checkpoint Index Ingest
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Walks a directory tree of checkpoint metadata files, loads one row per
//! item into an embedded SQLite table, and exports that table to Parquet.
//!
//! # Layout
//!
//! ```text
//! <root>/
//!   models/<item>/metadata.json
//!   loras/<item>/metadata.json
//!   controlnets/<item>/metadata.json
//!   uncurated_models/<item>/metadata.json
//! ```
//!
//! # Example
//!
//! ```no_run
//! use ckpt_ingest::{IngestConfig, IngestPipeline};
//!
//! let config = IngestConfig::builder().root("/data/community-models").build()?;
//! let summary = IngestPipeline::new(config).run()?;
//! for line in summary.report_lines() {
//!     println!("{line}");
//! }
//! # Ok::<(), ckpt_ingest::IngestError>(())
//! ```

pub mod config;
pub mod discover;
pub mod error;
pub mod export;
pub mod manifest;
pub mod metadata;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod store;

// Re-export commonly used types
pub use config::IngestConfig;
pub use error::{IngestError, Result, ValidationError};
pub use normalize::normalize;
pub use pipeline::IngestPipeline;
pub use report::Summary;
