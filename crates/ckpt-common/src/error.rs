//! Error types shared across the checkpoint index crates

use thiserror::Error;

/// Result type alias for common operations
pub type Result<T> = std::result::Result<T, CommonError>;

/// Errors raised by the shared helpers
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown category '{0}'. Expected one of: models, loras, controlnets, uncurated_models")]
    InvalidCategory(String),
}
