//! Configuration for an ingest run
//!
//! Every setting has a default, so an empty configuration scans the category
//! folders next to the working directory and writes `ckpt.db` and
//! `ckpt.parquet` into it.

use crate::error::{IngestError, Result};
use crate::export::ParquetCompression;
use crate::metadata::METADATA_FILE_NAME;
use ckpt_common::Category;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// ============================================================================
// Defaults
// ============================================================================

/// Directory containing the category folders
pub const DEFAULT_ROOT: &str = "..";

/// Table store file
pub const DEFAULT_TABLE_PATH: &str = "ckpt.db";

/// Exported Parquet file
pub const DEFAULT_EXPORT_PATH: &str = "ckpt.parquet";

/// Ingest run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Directory containing one folder per category
    pub root: PathBuf,

    /// Categories to scan, in traversal order
    pub categories: Vec<Category>,

    /// Metadata file name inside each item directory
    pub metadata_file: String,

    /// Table store file, reset on every run
    pub table_path: PathBuf,

    /// Parquet export, overwritten on every run
    pub export_path: PathBuf,

    /// Parquet compression codec
    #[serde(default)]
    pub compression: ParquetCompression,

    /// Optional CSV copy of the exported rows
    #[serde(default)]
    pub csv_path: Option<PathBuf>,

    /// Optional replayable SQL dump
    #[serde(default)]
    pub sql_dump_path: Option<PathBuf>,

    /// Optional run manifest sidecar
    #[serde(default)]
    pub manifest_path: Option<PathBuf>,

    /// Draw a progress bar while loading
    #[serde(default)]
    pub show_progress: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            categories: Category::ALL.to_vec(),
            metadata_file: METADATA_FILE_NAME.to_string(),
            table_path: PathBuf::from(DEFAULT_TABLE_PATH),
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            compression: ParquetCompression::default(),
            csv_path: None,
            sql_dump_path: None,
            manifest_path: None,
            show_progress: false,
        }
    }
}

impl IngestConfig {
    /// Create a builder for fluent configuration
    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder::default()
    }

    /// Artifacts produced by the export step, parquet first
    pub fn export_artifacts(&self) -> Vec<&Path> {
        std::iter::once(self.export_path.as_path())
            .chain(self.csv_path.as_deref())
            .chain(self.sql_dump_path.as_deref())
            .chain(self.manifest_path.as_deref())
            .collect()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(IngestError::config("At least one category must be scanned"));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category) {
                return Err(IngestError::config(format!(
                    "Category '{}' is listed more than once",
                    category
                )));
            }
        }

        if self.metadata_file.trim().is_empty() {
            return Err(IngestError::config("Metadata file name cannot be empty"));
        }

        let mut outputs = HashSet::new();
        for path in std::iter::once(self.table_path.as_path()).chain(self.export_artifacts()) {
            if path.as_os_str().is_empty() {
                return Err(IngestError::config("Output paths cannot be empty"));
            }
            if !outputs.insert(path) {
                return Err(IngestError::config(format!(
                    "Output path '{}' is used for more than one artifact",
                    path.display()
                )));
            }
        }

        Ok(())
    }
}

/// Builder for IngestConfig
#[derive(Default)]
pub struct IngestConfigBuilder {
    config: IngestConfig,
}

impl IngestConfigBuilder {
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    pub fn categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.config.categories = categories.into_iter().collect();
        self
    }

    pub fn metadata_file(mut self, name: impl Into<String>) -> Self {
        self.config.metadata_file = name.into();
        self
    }

    pub fn table_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.table_path = path.into();
        self
    }

    pub fn export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.export_path = path.into();
        self
    }

    pub fn compression(mut self, compression: ParquetCompression) -> Self {
        self.config.compression = compression;
        self
    }

    pub fn csv_path(mut self, path: Option<PathBuf>) -> Self {
        self.config.csv_path = path;
        self
    }

    pub fn sql_dump_path(mut self, path: Option<PathBuf>) -> Self {
        self.config.sql_dump_path = path;
        self
    }

    pub fn manifest_path(mut self, path: Option<PathBuf>) -> Self {
        self.config.manifest_path = path;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.config.show_progress = show;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<IngestConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
