//! # Reconciliation Pipeline
//!
//! Orchestrates one roster reconciliation pass: fetch the authoritative
//! roster in bulk, fetch every target roster concurrently, skip entries
//! whose target fetch failed, and compute the minimal add/drop actions
//! per logical group and role.
//!
//! ## Architecture
//!
//! ```text
//! Mapping ──► ReconciliationStrategy ──► RosterIndex
//!                     │                      │
//!                     │    TargetRosterService ──► TargetRosters
//!                     │                      │
//!                     └──► combine + deltas ◄┘
//!                                │
//!                            SyncReport ──► DeltaStreams ──► DeltaSink
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use rosync_sync::{CourseSyncStrategy, ReconciliationPipeline};
//! use rosync_roster::prelude::*;
//!
//! let strategy = Arc::new(CourseSyncStrategy::new(source));
//! let pipeline = ReconciliationPipeline::new(strategy, targets, Period::new("Winter", "2024"));
//!
//! let report = pipeline.run(&mapping).await?;
//! for skipped in report.skipped() {
//!     tracing::warn!(key = %skipped.key, target_id = %skipped.target_id, "entry skipped");
//! }
//! report.enrollment_streams().push_to(sink.as_ref()).await?;
//! ```

pub mod aggregate;
pub mod delta;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod strategy;

// Re-export main types
pub use aggregate::combine_rosters;
pub use delta::{compute_deltas, DeltaPolicy};
pub use error::{SyncError, SyncResult};
pub use output::{ConduitCsvFormatter, DeltaStreams, ENROLLMENTS_STREAM};
pub use pipeline::ReconciliationPipeline;
pub use report::{SkippedEntry, SyncReport, SyncStats};
pub use strategy::{CourseSyncStrategy, ProgramSyncStrategy, ReconciliationStrategy};
