//! # Roster Framework
//!
//! Core abstractions for reconciling group membership between an
//! authoritative student-information source and a target learning
//! platform.
//!
//! The framework models one reconciliation pass: membership facts from
//! the authoritative source are folded into an immutable [`RosterIndex`],
//! per-group rosters are fetched from the target system behind the
//! [`traits::TargetRosterService`] boundary, and the difference between
//! the two is expressed as [`DeltaRecord`] add/drop actions.
//!
//! ## Crate Organization
//!
//! - [`ids`] - Type-safe identifiers (`GroupCode`, `TargetId`, `MemberId`)
//! - [`role`] - The enrollment role enumeration
//! - [`record`] - Membership facts as produced by the authoritative source
//! - [`index`] - The nested `(group, section) → role → members` index
//! - [`mapping`] - Logical-group mapping configuration
//! - [`delta`] - Add/drop delta records
//! - [`outcome`] - Per-target fetch outcomes with isolated failures
//! - [`error`] - Error types for each boundary
//! - [`traits`] - Boundary traits for the external collaborators

pub mod delta;
pub mod error;
pub mod ids;
pub mod index;
pub mod mapping;
pub mod outcome;
pub mod record;
pub mod role;
pub mod traits;

/// Prelude module for convenient imports.
///
/// ```
/// use rosync_roster::prelude::*;
/// ```
pub mod prelude {
    pub use crate::delta::{DeltaAction, DeltaRecord};
    pub use crate::error::{FetchError, MappingError, SourceError};
    pub use crate::ids::{GroupCode, MemberId, TargetId};
    pub use crate::index::RosterIndex;
    pub use crate::mapping::{Mapping, MappingEntry, MappingSource};
    pub use crate::outcome::{FetchOutcome, RoleMembership, TargetRosters};
    pub use crate::record::RosterRecord;
    pub use crate::role::Role;
    pub use crate::traits::{
        AuthoritativeSource, DeltaSink, Period, SinkError, TargetRosterService,
    };
}

// Re-export async_trait for boundary implementors
pub use async_trait::async_trait;
