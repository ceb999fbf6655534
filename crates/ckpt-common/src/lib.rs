//! Checkpoint Index Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the checkpoint index tools.
//!
//! # Overview
//!
//! - **Types**: [`Category`] and the flat [`CheckpointRecord`] row shape
//! - **Error Handling**: [`CommonError`] and the crate [`Result`] alias
//! - **Logging**: `tracing` subscriber setup shared by every binary
//! - **Literals**: quote-doubling for values embedded in SQL text
//! - **Checksums**: SHA-256 of exported artifacts
//!
//! # Example
//!
//! ```
//! use ckpt_common::Category;
//!
//! let category: Category = "loras".parse().unwrap();
//! assert_eq!(category.model_type(), "lora");
//! ```

pub mod checksum;
pub mod error;
pub mod literal;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{CommonError, Result};
pub use types::{Category, CheckpointRecord, StoredCheckpoint, CHECKPOINT_COLUMNS};
