//! Error types for model file operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, validating or writing a model.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Background image could not be decoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Invalid format structure or content
    #[error("Invalid format: {message}")]
    InvalidFormat {
        /// Description of the format error
        message: String,
    },

    /// A label in `keys` has no entry in `index`
    #[error("Key '{key}' is listed in keys but missing from index")]
    MissingIndex {
        /// The label without an index entry
        key: String,
    },

    /// A label in `index` is not listed in `keys`
    #[error("Index entry '{key}' is not listed in keys")]
    UnlistedKey {
        /// The label missing from keys
        key: String,
    },

    /// A label appears more than once in `keys`
    #[error("Key '{key}' is listed more than once")]
    DuplicateKey {
        /// The repeated label
        key: String,
    },

    /// An index entry points past the end of `pos`
    #[error("Index {index} in group '{key}' is out of range for {len} positions")]
    IndexOutOfRange {
        /// Group label
        key: String,
        /// Offending offset
        index: usize,
        /// Number of positions available
        len: usize,
    },

    /// A position is claimed by more than one index entry
    #[error("Position {index} is referenced by both '{first}' and '{second}'")]
    DuplicateIndex {
        /// Offending offset
        index: usize,
        /// Label of the first reference
        first: String,
        /// Label of the second reference
        second: String,
    },

    /// Index entries do not cover every position
    #[error("Index references {referenced} positions but pos holds {len}")]
    PositionCountMismatch {
        /// Total number of offsets across all groups
        referenced: usize,
        /// Length of `pos`
        len: usize,
    },

    /// Image file not found at expected path
    #[error("Image not found: {path:?}")]
    ImageNotFound {
        /// Path where the image was expected
        path: PathBuf,
    },
}

impl FormatError {
    /// Create an invalid format error with a message.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create an out-of-range index error.
    pub fn index_out_of_range(key: impl Into<String>, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange {
            key: key.into(),
            index,
            len,
        }
    }

    /// Whether the error describes a malformed schema (as opposed to I/O).
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::MissingIndex { .. }
                | Self::UnlistedKey { .. }
                | Self::DuplicateKey { .. }
                | Self::IndexOutOfRange { .. }
                | Self::DuplicateIndex { .. }
                | Self::PositionCountMismatch { .. }
        )
    }
}
