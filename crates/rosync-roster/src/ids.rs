//! Type-safe identifiers for the roster domain.
//!
//! Newtype wrappers keep group codes, target-system ids, and member
//! identifiers from being confused with each other or with plain strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A physical group code in the authoritative system (e.g. a course code
/// such as `ANAT611`). Cross-listed logical groups reference several of
/// these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupCode(String);

impl GroupCode {
    /// Create a group code from its string form.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The raw code string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Opaque identifier of a group in the target system.
///
/// The mapping file assigns one per logical group; the target fetcher
/// uses it as the request parameter value and the reconciliation
/// pipeline uses it to pair mapping entries with fetch outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(i64);

impl TargetId {
    /// Wrap a raw target-system id.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw numeric value.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TargetId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A normalized member identifier.
///
/// Both systems identify people by an institutional id number, but the
/// authoritative system prefixes it with a record-type marker character
/// and the target system sometimes serializes it as a JSON number.
/// [`MemberId::normalize`] folds both shapes into one canonical string so
/// set algebra over the two rosters compares like with like.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Create a member id from an already-normalized string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Normalize a raw identifier: trim whitespace and strip a single
    /// leading marker character if present.
    ///
    /// ```
    /// use rosync_roster::ids::MemberId;
    ///
    /// assert_eq!(MemberId::normalize("P001234", Some('P')).as_str(), "001234");
    /// assert_eq!(MemberId::normalize(" 001234 ", Some('P')).as_str(), "001234");
    /// ```
    #[must_use]
    pub fn normalize(raw: &str, marker: Option<char>) -> Self {
        let trimmed = raw.trim();
        let stripped = match marker {
            Some(m) => trimmed.strip_prefix(m).unwrap_or(trimmed),
            None => trimmed,
        };
        Self(stripped.to_string())
    }

    /// The canonical id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty after normalization.
    ///
    /// Empty ids carry no identity and must be excluded from rosters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_id_marker_stripped() {
        let id = MemberId::normalize("P001234", Some('P'));
        assert_eq!(id.as_str(), "001234");
    }

    #[test]
    fn test_member_id_without_marker_unchanged() {
        let id = MemberId::normalize("001234", Some('P'));
        assert_eq!(id.as_str(), "001234");
    }

    #[test]
    fn test_member_id_only_leading_marker_stripped() {
        // An interior 'P' is part of the id, not a marker.
        let id = MemberId::normalize("P00P34", Some('P'));
        assert_eq!(id.as_str(), "00P34");
    }

    #[test]
    fn test_member_id_whitespace_trimmed() {
        let id = MemberId::normalize("  P001234\n", Some('P'));
        assert_eq!(id.as_str(), "001234");
    }

    #[test]
    fn test_member_id_empty_after_normalization() {
        assert!(MemberId::normalize("P", Some('P')).is_empty());
        assert!(MemberId::normalize("   ", None).is_empty());
    }

    #[test]
    fn test_target_id_display() {
        assert_eq!(TargetId::new(4423).to_string(), "4423");
    }

    #[test]
    fn test_group_code_serde_transparent() {
        let code: GroupCode = serde_json::from_str("\"ANAT611\"").unwrap();
        assert_eq!(code, GroupCode::new("ANAT611"));
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"ANAT611\"");
    }
}
