//! Error types for the roster boundaries.
//!
//! Fetch failures are isolated per target id and converted to data
//! ([`crate::outcome::FetchOutcome::Failed`]) at the fetch boundary;
//! source errors are fatal for the pass and propagate to the caller.

use thiserror::Error;

/// A single target-roster fetch failed.
///
/// Never fatal: the reconciliation pipeline skips the affected mapping
/// entry for the current pass and reports the id in the error set.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The target returned a non-success HTTP status.
    #[error("target returned status {status}")]
    Http { status: u16 },

    /// Transport-level failure (connect, TLS, read).
    #[error("network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The response body could not be parsed into the expected shape.
    #[error("invalid payload: {message}")]
    InvalidPayload { message: String },

    /// The target returned its error envelope instead of a roster.
    #[error("service exception {code}: {message}")]
    Service { code: String, message: String },

    /// The request exceeded the configured per-fetch timeout.
    #[error("fetch timed out after {secs} seconds")]
    Timeout { secs: u64 },
}

impl FetchError {
    /// Create a network error without an underlying source.
    pub fn network(message: impl Into<String>) -> Self {
        FetchError::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create a network error wrapping an underlying transport error.
    pub fn network_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        FetchError::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-payload error.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        FetchError::InvalidPayload {
            message: message.into(),
        }
    }

    /// Whether a later pass could plausibly succeed without
    /// configuration changes.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::Network { .. } | FetchError::Timeout { .. } | FetchError::Http { .. }
        )
    }
}

/// The authoritative source failed; fatal for the current pass.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The underlying query or transport failed.
    #[error("source query failed: {message}")]
    Query {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A query expected to yield exactly one scalar value returned more
    /// than one row. Surfaced rather than silently picking a value.
    #[error("ambiguous result: {context}")]
    AmbiguousResult { context: String },
}

impl SourceError {
    /// Create a query error without an underlying source.
    pub fn query(message: impl Into<String>) -> Self {
        SourceError::Query {
            message: message.into(),
            source: None,
        }
    }

    /// Create a query error wrapping an underlying error.
    pub fn query_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SourceError::Query {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an ambiguous-result error.
    pub fn ambiguous(context: impl Into<String>) -> Self {
        SourceError::AmbiguousResult {
            context: context.into(),
        }
    }
}

/// The mapping configuration is invalid.
#[derive(Debug, Error)]
pub enum MappingError {
    /// A course-backed entry listed no courses.
    #[error("mapping entry '{key}' has an empty courses list")]
    EmptyCourses { key: String },

    /// The mapping file could not be parsed.
    #[error("failed to parse mapping: {message}")]
    Parse { message: String },
}
