//! Add/drop delta records produced by a reconciliation pass.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::MemberId;
use crate::role::Role;

/// The corrective action a delta record asks the target system to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaAction {
    /// Enroll the member in the logical group.
    Add,
    /// Remove the member from the logical group.
    Drop,
}

impl fmt::Display for DeltaAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeltaAction::Add => f.write_str("add"),
            DeltaAction::Drop => f.write_str("drop"),
        }
    }
}

/// One corrective action for one member in one logical group and role.
///
/// Delta collections are duplicate-free by construction: the computation
/// emits at most one record per `(action, key, member, role)` because
/// each is drawn from a set difference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeltaRecord {
    /// The action to take.
    pub action: DeltaAction,
    /// Logical group key in the target system.
    pub key: String,
    /// The affected member.
    pub member: MemberId,
    /// The role the action applies to.
    pub role: Role,
}

impl DeltaRecord {
    /// Create an add record.
    pub fn add(key: impl Into<String>, member: MemberId, role: Role) -> Self {
        Self {
            action: DeltaAction::Add,
            key: key.into(),
            member,
            role,
        }
    }

    /// Create a drop record.
    pub fn drop(key: impl Into<String>, member: MemberId, role: Role) -> Self {
        Self {
            action: DeltaAction::Drop,
            key: key.into(),
            member,
            role,
        }
    }
}
