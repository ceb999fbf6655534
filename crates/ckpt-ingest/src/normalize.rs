//! Record normalization
//!
//! Turns a decoded metadata document into the flat [`CheckpointRecord`] row.
//! Values are copied verbatim; inserts bind them as parameters, so no
//! quoting happens here.

use crate::error::ValidationError;
use crate::metadata::MetadataDocument;
use ckpt_common::{Category, CheckpointRecord};

/// Normalize one metadata record of the given category.
///
/// `name`, `version` and `file` must be present and non-empty. Optional
/// encoder fields default to an empty string. `url` is only taken from
/// `download.file` for categories that carry downloads.
pub fn normalize(
    category: Category,
    document: &MetadataDocument,
) -> Result<CheckpointRecord, ValidationError> {
    let fields = &document.fields;

    let url = if category.has_download_url() {
        fields
            .download
            .as_ref()
            .and_then(|download| download.file.clone())
            .unwrap_or_default()
    } else {
        String::new()
    };

    Ok(CheckpointRecord {
        model_type: category.model_type().to_string(),
        model_family: required(&fields.version, "version")?,
        model_name: required(&fields.name, "name")?,
        ckpt_file: required(&fields.file, "file")?,
        url,
        autoencoder: optional(&fields.autoencoder),
        clip_encoder: optional(&fields.clip_encoder),
        image_encoder: optional(&fields.image_encoder),
        t5_encoder: optional(&fields.t5_encoder),
        full_json: document.raw.to_string(),
    })
}

fn required(value: &Option<String>, key: &'static str) -> Result<String, ValidationError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::MissingField(key)),
    }
}

fn optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}
