//! Enrollment roles recognized by the reconciliation engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The role a member holds within a group.
///
/// The authoritative source derives the role from grade data (an audit
/// grade maps to [`Role::AuditingMember`]); the target system assigns it
/// through numeric role designators. Both collapse into this enum, and
/// reconciliation runs independently per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A regularly enrolled member.
    #[serde(rename = "student")]
    Member,
    /// A member enrolled in an auditing capacity.
    #[serde(rename = "auditingstudent")]
    AuditingMember,
}

impl Role {
    /// Both roles, in the order the pipeline processes them.
    pub const ALL: [Role; 2] = [Role::Member, Role::AuditingMember];

    /// The wire name used in delta output and mapping data.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "student",
            Role::AuditingMember => "auditingstudent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Member),
            "auditingstudent" => Ok(Role::AuditingMember),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// A role string that is not part of the recognized set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);
