//! Membership facts as returned by the authoritative source.

use serde::{Deserialize, Serialize};

use crate::ids::{GroupCode, MemberId};
use crate::role::Role;

/// One membership fact: a member holds a role in a group (optionally
/// within one subgroup/section of it).
///
/// The authoritative source returns a flat collection of these for the
/// requested period; [`crate::index::RosterIndex::build`] folds them into
/// the indexed form the pipeline works against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRecord {
    /// Physical group code.
    pub group: GroupCode,
    /// Subgroup qualifier (e.g. section). `None` means the group is not
    /// sectioned and the record applies across all subgroups.
    pub subgroup: Option<String>,
    /// Role the member holds.
    pub role: Role,
    /// Normalized member identifier.
    pub member: MemberId,
}

impl RosterRecord {
    /// Create a record for an un-sectioned group.
    pub fn new(group: impl Into<GroupCode>, role: Role, member: impl Into<MemberId>) -> Self {
        Self {
            group: group.into(),
            subgroup: None,
            role,
            member: member.into(),
        }
    }

    /// Set the subgroup qualifier.
    #[must_use]
    pub fn with_subgroup(mut self, subgroup: impl Into<String>) -> Self {
        self.subgroup = Some(subgroup.into());
        self
    }

    /// The index key for the subgroup: an absent subgroup is uniformly
    /// the empty string, so un-sectioned and sectioned groups never
    /// collide in the index.
    #[must_use]
    pub fn section_key(&self) -> &str {
        self.subgroup.as_deref().unwrap_or("")
    }
}
