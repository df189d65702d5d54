//! Boundary traits for the external collaborators.
//!
//! The engine consumes two data sources and one delivery channel, all
//! behind traits so transports stay out of the core: the authoritative
//! source (a SIS database in production), the target roster service (an
//! LMS web-services API), and the delta sink (an SFTP drop in
//! production, a directory in tests).

use async_trait::async_trait;

use crate::error::SourceError;
use crate::ids::TargetId;
use crate::outcome::TargetRosters;
use crate::record::RosterRecord;

/// The academic period a reconciliation pass covers.
///
/// Threaded into the pipeline at construction time; the period is
/// explicit configuration, never global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    /// Term name, e.g. `Winter`.
    pub term: String,
    /// Four-digit year, e.g. `2024`.
    pub year: String,
}

impl Period {
    /// Create a period.
    pub fn new(term: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            year: year.into(),
        }
    }

    /// Concatenated `TermYear` form used in file and mapping names.
    #[must_use]
    pub fn term_year(&self) -> String {
        format!("{}{}", self.term, self.year)
    }
}

/// The authoritative membership source.
///
/// Implementations construct their own queries; the engine only decides
/// which group or program codes to request and consumes the normalized
/// record collection. Roles arrive already normalized (e.g. an audit
/// grade has been mapped to the auditing role).
#[async_trait]
pub trait AuthoritativeSource: Send + Sync {
    /// Fetch every membership record for the given physical group codes
    /// in one bulk operation.
    async fn fetch_group_records(
        &self,
        period: &Period,
        groups: &[crate::ids::GroupCode],
    ) -> Result<Vec<RosterRecord>, SourceError>;

    /// Fetch every member of the given programs, as primary-role records
    /// with the program code as the group and no subgroup.
    async fn fetch_program_records(
        &self,
        period: &Period,
        programs: &[String],
    ) -> Result<Vec<RosterRecord>, SourceError>;
}

/// The target roster service.
///
/// One fetch per id, executed concurrently by implementations; a failure
/// on one id never prevents results for the others and never surfaces as
/// an `Err` — it becomes a failed outcome inside the returned
/// [`TargetRosters`], which covers every requested id exactly once.
#[async_trait]
pub trait TargetRosterService: Send + Sync {
    /// Fetch the role-partitioned roster for each id.
    async fn fetch_rosters(&self, ids: &[TargetId]) -> TargetRosters;
}

/// Delivery channel for serialized delta output.
///
/// Receives one payload per named stream; the transport (SFTP, local
/// file, test capture) is the implementation's concern.
#[async_trait]
pub trait DeltaSink: Send + Sync {
    /// Deliver one named stream's CSV payload.
    async fn put(&self, stream: &str, payload: &[u8]) -> Result<(), SinkError>;
}

/// Delivery of a delta stream failed.
#[derive(Debug, thiserror::Error)]
#[error("failed to deliver stream '{stream}': {message}")]
pub struct SinkError {
    /// The stream that failed to deliver.
    pub stream: String,
    /// What went wrong.
    pub message: String,
}

impl SinkError {
    /// Create a sink error.
    pub fn new(stream: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            message: message.into(),
        }
    }
}
