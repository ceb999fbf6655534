//! Metadata source decoding
//!
//! Each item directory holds one `metadata.json`. It is decoded twice from the
//! same text: into the untouched JSON value (kept for `full_json`) and into
//! [`CheckpointMetadata`], the explicit schema of the keys the normalizer
//! reads. Keys outside the schema are ignored there but survive in the raw
//! value.

use crate::error::{IngestError, Result};
use serde::de::Error as _;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Default name of the metadata file inside every item directory.
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// Keys read from a metadata record. All of them are optional at decode
/// time; required-ness is enforced by the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CheckpointMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
    pub file: Option<String>,
    pub autoencoder: Option<String>,
    pub clip_encoder: Option<String>,
    pub image_encoder: Option<String>,
    pub t5_encoder: Option<String>,
    pub download: Option<DownloadDescriptor>,
}

/// Nested `download` object of lora and controlnet records
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DownloadDescriptor {
    pub file: Option<String>,
}

/// A decoded metadata source
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataDocument {
    /// Typed view of the keys the normalizer uses
    pub fields: CheckpointMetadata,

    /// The complete record as read, key order preserved
    pub raw: Value,
}

impl MetadataDocument {
    /// Decode metadata text. The top level must be a JSON object.
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        let raw: Value = serde_json::from_str(text)?;
        Self::from_value(raw)
    }

    /// Build a document from an already decoded JSON value
    pub fn from_value(raw: Value) -> serde_json::Result<Self> {
        if !raw.is_object() {
            return Err(serde_json::Error::custom(
                "metadata record must be a JSON object",
            ));
        }

        let fields = CheckpointMetadata::deserialize(&raw)?;
        Ok(Self { fields, raw })
    }

    /// Read and decode a metadata file
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
        Self::parse(&text).map_err(|e| IngestError::decode(path, e))
    }
}
