//! Per-target fetch outcomes with isolated failures.

use std::collections::{HashMap, HashSet};

use crate::error::FetchError;
use crate::ids::{MemberId, TargetId};
use crate::role::Role;

/// The role-partitioned membership of one target group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleMembership {
    /// Members holding the primary role designator.
    pub members: HashSet<MemberId>,
    /// Members holding the auditing role designator.
    pub auditing: HashSet<MemberId>,
}

impl RoleMembership {
    /// Create an empty membership.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The member set for a role.
    #[must_use]
    pub fn role(&self, role: Role) -> &HashSet<MemberId> {
        match role {
            Role::Member => &self.members,
            Role::AuditingMember => &self.auditing,
        }
    }

    /// Mutable member set for a role.
    pub fn role_mut(&mut self, role: Role) -> &mut HashSet<MemberId> {
        match role {
            Role::Member => &mut self.members,
            Role::AuditingMember => &mut self.auditing,
        }
    }
}

/// The result of fetching one target roster: either the role-partitioned
/// membership, or the failure that prevented it. Never both.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The roster was fetched and partitioned by role.
    Success(RoleMembership),
    /// The fetch failed; the entry is skipped for this pass.
    Failed(FetchError),
}

impl FetchOutcome {
    /// The membership, if the fetch succeeded.
    #[must_use]
    pub fn membership(&self) -> Option<&RoleMembership> {
        match self {
            FetchOutcome::Success(m) => Some(m),
            FetchOutcome::Failed(_) => None,
        }
    }

    /// Whether the fetch failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }
}

/// The joined result of fetching every requested target roster.
///
/// Covers each requested id exactly once; failures are recorded per id
/// and never abort the collection as a whole. Consumed once by the
/// reconciliation pipeline and then discarded.
#[derive(Debug, Default)]
pub struct TargetRosters {
    outcomes: HashMap<TargetId, FetchOutcome>,
}

impl TargetRosters {
    /// Build from per-id outcomes.
    #[must_use]
    pub fn new(outcomes: HashMap<TargetId, FetchOutcome>) -> Self {
        Self { outcomes }
    }

    /// The outcome for an id, if it was requested.
    #[must_use]
    pub fn outcome(&self, id: TargetId) -> Option<&FetchOutcome> {
        self.outcomes.get(&id)
    }

    /// The membership for an id, if it was requested and succeeded.
    #[must_use]
    pub fn membership(&self, id: TargetId) -> Option<&RoleMembership> {
        self.outcomes.get(&id).and_then(FetchOutcome::membership)
    }

    /// Whether the fetch for an id failed. An id that was never
    /// requested is not failed; the pipeline only consults ids it asked
    /// for.
    #[must_use]
    pub fn is_failed(&self, id: TargetId) -> bool {
        self.outcomes.get(&id).is_some_and(FetchOutcome::is_failed)
    }

    /// The explicit error set: every id whose fetch failed, with its
    /// failure. Reported to the caller for logging and alerting.
    #[must_use]
    pub fn failures(&self) -> Vec<(TargetId, &FetchError)> {
        let mut failed: Vec<(TargetId, &FetchError)> = self
            .outcomes
            .iter()
            .filter_map(|(id, outcome)| match outcome {
                FetchOutcome::Failed(err) => Some((*id, err)),
                FetchOutcome::Success(_) => None,
            })
            .collect();
        failed.sort_by_key(|(id, _)| *id);
        failed
    }

    /// Number of requested ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether no ids were requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
