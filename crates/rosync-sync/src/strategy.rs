//! Reconciliation strategies: course-backed and program-backed passes.
//!
//! The two pass variants differ in where authoritative membership comes
//! from and which corrective actions they may emit. Each is a concrete
//! [`ReconciliationStrategy`] selected by configuration; the pipeline is
//! otherwise identical.

use std::sync::Arc;

use async_trait::async_trait;

use rosync_roster::delta::DeltaRecord;
use rosync_roster::error::SourceError;
use rosync_roster::index::RosterIndex;
use rosync_roster::mapping::{Mapping, MappingEntry};
use rosync_roster::outcome::RoleMembership;
use rosync_roster::role::Role;
use rosync_roster::traits::{AuthoritativeSource, Period};

use crate::aggregate::combine_rosters;
use crate::delta::{compute_deltas, DeltaPolicy};

/// One reconciliation variant: how to obtain the authoritative roster
/// and how to turn one entry's rosters into delta records.
#[async_trait]
pub trait ReconciliationStrategy: Send + Sync {
    /// Fetch and index the authoritative membership backing the mapping,
    /// in one bulk operation.
    async fn fetch_authoritative(
        &self,
        period: &Period,
        mapping: &Mapping,
    ) -> Result<RosterIndex, SourceError>;

    /// Compute the delta records for one mapping entry whose target
    /// roster was fetched successfully.
    fn compute_entry_deltas(
        &self,
        entry: &MappingEntry,
        index: &RosterIndex,
        target: &RoleMembership,
    ) -> Vec<DeltaRecord>;
}

/// Course-backed reconciliation: the target mirrors the (cross-listed)
/// course rosters exactly, so both adds and drops are emitted. Auditing
/// members are reconciled as an independent role when enabled.
pub struct CourseSyncStrategy {
    source: Arc<dyn AuthoritativeSource>,
    sync_audits: bool,
}

impl CourseSyncStrategy {
    /// Create a course strategy with auditing-role sync enabled.
    pub fn new(source: Arc<dyn AuthoritativeSource>) -> Self {
        Self {
            source,
            sync_audits: true,
        }
    }

    /// Enable or disable auditing-role sync.
    #[must_use]
    pub fn with_sync_audits(mut self, sync_audits: bool) -> Self {
        self.sync_audits = sync_audits;
        self
    }

    fn roles(&self) -> &'static [Role] {
        if self.sync_audits {
            &[Role::Member, Role::AuditingMember]
        } else {
            &[Role::Member]
        }
    }
}

#[async_trait]
impl ReconciliationStrategy for CourseSyncStrategy {
    async fn fetch_authoritative(
        &self,
        period: &Period,
        mapping: &Mapping,
    ) -> Result<RosterIndex, SourceError> {
        let groups = mapping.course_groups();
        let mut records = self.source.fetch_group_records(period, &groups).await?;

        // Courses referenced without a section span all sections: blank
        // the qualifier so their records index under the empty section
        // key the lookup uses.
        let unsectioned = mapping.unsectioned_course_groups();
        for record in &mut records {
            if unsectioned.contains(&record.group) {
                record.subgroup = None;
            }
        }

        Ok(RosterIndex::build(records))
    }

    fn compute_entry_deltas(
        &self,
        entry: &MappingEntry,
        index: &RosterIndex,
        target: &RoleMembership,
    ) -> Vec<DeltaRecord> {
        let mut records = Vec::new();
        for &role in self.roles() {
            let authoritative = combine_rosters(entry, role, index);
            records.extend(compute_deltas(
                DeltaPolicy::Symmetric,
                &entry.key,
                role,
                &authoritative,
                target.role(role),
            ));
        }
        records
    }
}

/// Program-backed reconciliation: every member of a program belongs in
/// the group, but membership beyond the program (manual enrollments) is
/// legitimate, so only adds are emitted and only for the primary role.
pub struct ProgramSyncStrategy {
    source: Arc<dyn AuthoritativeSource>,
}

impl ProgramSyncStrategy {
    /// Create a program strategy.
    pub fn new(source: Arc<dyn AuthoritativeSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl ReconciliationStrategy for ProgramSyncStrategy {
    async fn fetch_authoritative(
        &self,
        period: &Period,
        mapping: &Mapping,
    ) -> Result<RosterIndex, SourceError> {
        let programs = mapping.programs();
        let records = self.source.fetch_program_records(period, &programs).await?;
        Ok(RosterIndex::build(records))
    }

    fn compute_entry_deltas(
        &self,
        entry: &MappingEntry,
        index: &RosterIndex,
        target: &RoleMembership,
    ) -> Vec<DeltaRecord> {
        let authoritative = combine_rosters(entry, Role::Member, index);
        compute_deltas(
            DeltaPolicy::AddOnly,
            &entry.key,
            Role::Member,
            &authoritative,
            target.role(Role::Member),
        )
    }
}
