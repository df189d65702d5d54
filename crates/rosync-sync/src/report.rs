//! The outcome of one reconciliation pass.

use chrono::{DateTime, Utc};
use serde::Serialize;

use rosync_roster::delta::{DeltaAction, DeltaRecord};
use rosync_roster::ids::TargetId;

use crate::output::{DeltaStreams, ENROLLMENTS_STREAM};

/// One mapping entry skipped because its target fetch failed.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedEntry {
    /// Logical group key.
    pub key: String,
    /// The target id whose fetch failed.
    pub target_id: TargetId,
    /// Why the fetch failed, rendered for logging.
    pub reason: String,
}

/// Counters for one pass.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SyncStats {
    /// Mapping entries considered.
    pub entries_total: usize,
    /// Entries skipped due to target fetch failure.
    pub entries_skipped: usize,
    /// Add records emitted.
    pub adds: usize,
    /// Drop records emitted.
    pub drops: usize,
}

impl SyncStats {
    /// Account for one emitted record.
    pub fn add_record(&mut self, record: &DeltaRecord) {
        match record.action {
            DeltaAction::Add => self.adds += 1,
            DeltaAction::Drop => self.drops += 1,
        }
    }
}

/// Report of one completed reconciliation pass: the flat delta
/// collection plus which entries were skipped and why.
///
/// Order within the collection is irrelevant; the caller partitions it
/// into named streams for delivery.
#[derive(Debug)]
pub struct SyncReport {
    deltas: Vec<DeltaRecord>,
    skipped: Vec<SkippedEntry>,
    stats: SyncStats,
    /// When the pass started.
    pub started_at: DateTime<Utc>,
    /// When the pass finished.
    pub finished_at: DateTime<Utc>,
}

impl SyncReport {
    pub(crate) fn new(
        deltas: Vec<DeltaRecord>,
        skipped: Vec<SkippedEntry>,
        stats: SyncStats,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            deltas,
            skipped,
            stats,
            started_at,
            finished_at,
        }
    }

    /// The emitted delta records.
    #[must_use]
    pub fn deltas(&self) -> &[DeltaRecord] {
        &self.deltas
    }

    /// Entries skipped because their target fetch failed, for logging
    /// and alerting.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    /// Pass counters.
    #[must_use]
    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Whether the pass produced any corrective action.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Partition the deltas into the standard single enrollment stream.
    #[must_use]
    pub fn enrollment_streams(&self) -> DeltaStreams {
        DeltaStreams::new().with_stream(ENROLLMENTS_STREAM, self.deltas.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosync_roster::ids::MemberId;
    use rosync_roster::role::Role;

    #[test]
    fn test_stats_count_by_action() {
        let mut stats = SyncStats::default();
        stats.add_record(&DeltaRecord::add("X", MemberId::new("1"), Role::Member));
        stats.add_record(&DeltaRecord::add("X", MemberId::new("2"), Role::Member));
        stats.add_record(&DeltaRecord::drop("X", MemberId::new("3"), Role::Member));
        assert_eq!(stats.adds, 2);
        assert_eq!(stats.drops, 1);
    }
}
