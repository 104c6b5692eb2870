//! # Collection Errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for collection operations
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Collection store errors
#[derive(Debug, Error)]
pub enum CollectionError {
    // Lookup errors
    #[error("No record '{id}' in collection '{collection}'")]
    NotFound { collection: String, id: String },

    #[error("Collection directory missing: {}", .0.display())]
    CollectionMissing(PathBuf),

    // Content errors
    #[error("Corrupt record '{id}' in collection '{collection}': {reason}")]
    CorruptRecord {
        collection: String,
        id: String,
        reason: String,
    },

    #[error("Failed to serialize record '{id}': {reason}")]
    Serialization { id: String, reason: String },

    // Validation errors
    #[error("Invalid identifier '{0}': not a filesystem-safe name")]
    InvalidIdentifier(String),

    #[error("Identifier '{0}' appears more than once in batch")]
    DuplicateIdentifier(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // I/O errors
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // Internal
    #[error("Batch worker panicked")]
    WorkerPanicked,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CollectionError {
    /// Map an I/O failure on `path`, turning `NotFound` into the
    /// collection-level lookup error.
    pub(crate) fn from_io(collection: &str, id: &str, path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            CollectionError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }
        } else {
            CollectionError::Io { path, source }
        }
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            CollectionError::NotFound { .. } => "COLLECTION_NOT_FOUND",
            CollectionError::CollectionMissing(_) => "COLLECTION_MISSING",
            CollectionError::CorruptRecord { .. } => "COLLECTION_CORRUPT_RECORD",
            CollectionError::Serialization { .. } => "COLLECTION_SERIALIZATION_FAILED",
            CollectionError::InvalidIdentifier(_) => "COLLECTION_INVALID_IDENTIFIER",
            CollectionError::DuplicateIdentifier(_) => "COLLECTION_DUPLICATE_IDENTIFIER",
            CollectionError::Configuration(_) => "COLLECTION_CONFIGURATION",
            CollectionError::Io { .. } => "COLLECTION_IO_ERROR",
            CollectionError::WorkerPanicked => "COLLECTION_WORKER_PANICKED",
            CollectionError::Internal(_) => "COLLECTION_INTERNAL",
        }
    }

    /// Whether the error means the identifier has no stored record
    pub fn is_not_found(&self) -> bool {
        matches!(self, CollectionError::NotFound { .. })
    }

    /// Whether the error means a stored record could not be decoded
    pub fn is_corrupt(&self) -> bool {
        matches!(self, CollectionError::CorruptRecord { .. })
    }
}
