//! Run manifest sidecar
//!
//! A small JSON document describing one run's outputs, written next to the
//! exported artifact when requested.

use crate::error::{IngestError, Result};
use crate::report::Summary;
use chrono::{DateTime, Utc};
use ckpt_common::checksum::compute_file_sha256;
use ckpt_common::Category;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Item count for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

/// Description of one completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    pub extracted_at: DateTime<Utc>,
    pub record_count: usize,
    pub categories: Vec<CategoryCount>,
    pub table_path: PathBuf,
    pub table_bytes: u64,
    pub export_path: PathBuf,
    pub export_bytes: u64,
    pub export_sha256: String,
}

impl RunManifest {
    /// Build the manifest for a finished run, hashing the exported file
    pub fn from_summary(summary: &Summary) -> Result<Self> {
        let export_sha256 = compute_file_sha256(&summary.export_path)?;

        Ok(Self {
            extracted_at: Utc::now(),
            record_count: summary.count,
            categories: summary
                .per_category
                .iter()
                .map(|&(category, count)| CategoryCount { category, count })
                .collect(),
            table_path: summary.table_path.clone(),
            table_bytes: summary.table_bytes,
            export_path: summary.export_path.clone(),
            export_bytes: summary.export_bytes,
            export_sha256,
        })
    }

    /// Write as pretty-printed JSON, replacing any existing file
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(IngestError::Manifest)?;
        std::fs::write(path, json).map_err(|e| IngestError::io(path, e))
    }
}
