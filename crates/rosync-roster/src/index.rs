//! The nested roster index built from authoritative membership facts.

use std::collections::{HashMap, HashSet};

use crate::ids::{GroupCode, MemberId};
use crate::record::RosterRecord;
use crate::role::Role;

/// Immutable index of authoritative membership, keyed by
/// `(group, section key)` and then by role.
///
/// Built once per reconciliation pass by [`RosterIndex::build`] and read
/// by the cross-list aggregation step. Un-sectioned groups are indexed
/// under the empty-string section key (see
/// [`RosterRecord::section_key`]), and lookups use the same
/// normalization, so the two kinds of group never collide.
#[derive(Debug, Clone, Default)]
pub struct RosterIndex {
    entries: HashMap<(GroupCode, String), HashMap<Role, HashSet<MemberId>>>,
}

impl RosterIndex {
    /// Fold a flat record collection into the nested index.
    ///
    /// Pure and deterministic: grouping is by `(group, section, role)`,
    /// each group of records collapses into a member-id set, and
    /// duplicate facts are absorbed by the set.
    #[must_use]
    pub fn build(records: impl IntoIterator<Item = RosterRecord>) -> Self {
        let mut entries: HashMap<(GroupCode, String), HashMap<Role, HashSet<MemberId>>> =
            HashMap::new();
        for record in records {
            let key = (record.group.clone(), record.section_key().to_string());
            entries
                .entry(key)
                .or_default()
                .entry(record.role)
                .or_default()
                .insert(record.member);
        }
        Self { entries }
    }

    /// The member set for a role at `(group, section_key)`, or `None` if
    /// the authoritative source has no such entry. A missing entry is a
    /// valid empty roster, not an error; callers treat `None` as ∅.
    #[must_use]
    pub fn members(
        &self,
        group: &GroupCode,
        section_key: &str,
        role: Role,
    ) -> Option<&HashSet<MemberId>> {
        self.entries
            .get(&(group.clone(), section_key.to_string()))
            .and_then(|roles| roles.get(&role))
    }

    /// Number of `(group, section)` entries in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
