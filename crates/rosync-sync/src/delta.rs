//! Delta computation: set algebra between authoritative and target
//! rosters.

use std::collections::HashSet;

use rosync_roster::delta::DeltaRecord;
use rosync_roster::ids::MemberId;
use rosync_roster::role::Role;

/// Which corrective actions a reconciliation may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaPolicy {
    /// The target must mirror the authoritative source exactly: members
    /// missing from the target are added, members present only on the
    /// target are dropped.
    Symmetric,
    /// Target membership may legitimately exceed the authoritative set
    /// (e.g. manual enrollments that must not be revoked): only missing
    /// members are added, nothing is ever dropped.
    AddOnly,
}

/// Compute the delta records for one logical group and role.
///
/// `add = authoritative − target`; under [`DeltaPolicy::Symmetric`]
/// additionally `drop = target − authoritative`. Both inputs are sets,
/// so the output carries no duplicate `(action, key, member, role)`
/// tuples by construction.
#[must_use]
pub fn compute_deltas(
    policy: DeltaPolicy,
    key: &str,
    role: Role,
    authoritative: &HashSet<MemberId>,
    target: &HashSet<MemberId>,
) -> Vec<DeltaRecord> {
    let mut records = Vec::new();

    for member in authoritative.difference(target) {
        records.push(DeltaRecord::add(key, member.clone(), role));
    }

    if policy == DeltaPolicy::Symmetric {
        for member in target.difference(authoritative) {
            records.push(DeltaRecord::drop(key, member.clone(), role));
        }
    }

    records
}
