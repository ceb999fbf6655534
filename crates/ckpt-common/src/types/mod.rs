//! Shared domain types

use crate::error::CommonError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column names of the checkpoint table, in storage and export order.
pub const CHECKPOINT_COLUMNS: [&str; 11] = [
    "id",
    "model_type",
    "model_family",
    "model_name",
    "ckpt_file",
    "url",
    "autoencoder",
    "clip_encoder",
    "image_encoder",
    "t5_encoder",
    "full_json",
];

/// Top-level item kind. Each category is scanned from a directory with the
/// same name as [`Category::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Models,
    Loras,
    Controlnets,
    UncuratedModels,
}

impl Category {
    /// Every category, in traversal order.
    pub const ALL: [Category; 4] = [
        Category::Models,
        Category::Loras,
        Category::Controlnets,
        Category::UncuratedModels,
    ];

    /// Directory name of the category root
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Models => "models",
            Category::Loras => "loras",
            Category::Controlnets => "controlnets",
            Category::UncuratedModels => "uncurated_models",
        }
    }

    /// Singular item kind stored in `model_type`.
    ///
    /// Every category name is a plain plural ending in "s", so the last
    /// character is simply dropped.
    pub fn model_type(self) -> &'static str {
        let name = self.as_str();
        &name[..name.len() - 1]
    }

    /// Whether metadata in this category may carry a `download.file` URL.
    pub fn has_download_url(self) -> bool {
        matches!(self, Category::Loras | Category::Controlnets)
    }
}

impl FromStr for Category {
    type Err = CommonError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s.trim())
            .ok_or_else(|| CommonError::InvalidCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat checkpoint row produced by normalization.
///
/// Optional source fields are stored as empty strings, never as NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CheckpointRecord {
    pub model_type: String,
    pub model_family: String,
    pub model_name: String,
    pub ckpt_file: String,
    pub url: String,
    pub autoencoder: String,
    pub clip_encoder: String,
    pub image_encoder: String,
    pub t5_encoder: String,
    pub full_json: String,
}

impl CheckpointRecord {
    /// Field values in [`CHECKPOINT_COLUMNS`] order, without the `id` column.
    pub fn values(&self) -> [&str; 10] {
        [
            self.model_type.as_str(),
            self.model_family.as_str(),
            self.model_name.as_str(),
            self.ckpt_file.as_str(),
            self.url.as_str(),
            self.autoencoder.as_str(),
            self.clip_encoder.as_str(),
            self.image_encoder.as_str(),
            self.t5_encoder.as_str(),
            self.full_json.as_str(),
        ]
    }
}

/// A checkpoint row together with its storage-assigned id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoredCheckpoint {
    pub id: i64,
    #[serde(flatten)]
    pub record: CheckpointRecord,
}
