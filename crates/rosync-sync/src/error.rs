//! Error types for the reconciliation pipeline.

use thiserror::Error;

use rosync_roster::error::{MappingError, SourceError};
use rosync_roster::traits::SinkError;

/// A reconciliation pass failed.
///
/// Any of these aborts the pass with no partial delta output. Per-id
/// target fetch failures are not errors at this level; they surface as
/// skipped entries in the report.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The authoritative source failed (including ambiguous scalar
    /// results, which are a data-integrity violation).
    #[error("authoritative source error: {0}")]
    Source(#[from] SourceError),

    /// The mapping configuration is invalid.
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Serializing a delta stream failed.
    #[error("failed to serialize delta stream '{stream}': {message}")]
    Csv { stream: String, message: String },

    /// Delivering a delta stream failed.
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),
}

impl SyncError {
    /// Create a CSV serialization error.
    pub fn csv(stream: impl Into<String>, message: impl Into<String>) -> Self {
        SyncError::Csv {
            stream: stream.into(),
            message: message.into(),
        }
    }
}

/// Result type for reconciliation operations.
pub type SyncResult<T> = Result<T, SyncError>;
