//! Logical-group mapping configuration.
//!
//! The mapping file pairs each logical group key in the target system
//! with the authoritative data backing it: either one or more physical
//! course codes (more than one for cross-listed groups, optionally
//! restricted to a section), or a program whose entire membership is
//! enrolled. The JSON shape matches the operational mapping files:
//!
//! ```json
//! {
//!     "ANAT611-24W": { "courses": ["ANAT611", "ANAT611L"], "section": "01", "id": 4423 },
//!     "CHIRO-ALL":   { "program": "CHIRO", "id": 5120 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::MappingError;
use crate::ids::{GroupCode, TargetId};

/// The authoritative data source for one mapping entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MappingSource {
    /// Membership is the union of the listed course rosters, optionally
    /// restricted to one section. Invariant: `courses` is non-empty.
    Courses {
        courses: Vec<GroupCode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        section: Option<String>,
    },
    /// Membership is every member of a program.
    Program { program: String },
}

/// One logical group: the target-system key and id plus the
/// authoritative source backing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// Logical group key in the target system (e.g. the course shortname).
    pub key: String,
    /// Identifier used to fetch the target roster.
    pub target_id: TargetId,
    /// Authoritative data backing this entry.
    pub source: MappingSource,
}

impl MappingEntry {
    /// The section key applied to every source group of this entry: the
    /// configured section, or the empty string for un-sectioned entries.
    /// Program entries always use the empty key.
    #[must_use]
    pub fn section_key(&self) -> &str {
        match &self.source {
            MappingSource::Courses {
                section: Some(s), ..
            } => s,
            _ => "",
        }
    }

    /// The physical group codes this entry draws membership from.
    /// For program entries, the program code acts as the single group.
    #[must_use]
    pub fn source_groups(&self) -> Vec<GroupCode> {
        match &self.source {
            MappingSource::Courses { courses, .. } => courses.clone(),
            MappingSource::Program { program } => vec![GroupCode::new(program.clone())],
        }
    }
}

/// Raw JSON value for one mapping entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawEntry {
    #[serde(flatten)]
    source: MappingSource,
    id: TargetId,
}

/// The full mapping configuration: ordered logical-group entries.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: Vec<MappingEntry>,
}

impl Mapping {
    /// Parse and validate a mapping from its JSON file content.
    ///
    /// Validation rejects entries whose `courses` list is empty; a
    /// cross-list with no constituents has no defined membership.
    pub fn from_json(json: &str) -> Result<Self, MappingError> {
        // serde_json::Map keeps file order (preserve_order feature), so
        // entries come out in the order operators wrote them.
        let raw: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).map_err(|e| MappingError::Parse {
                message: e.to_string(),
            })?;

        let mut entries = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            let raw_entry: RawEntry =
                serde_json::from_value(value).map_err(|e| MappingError::Parse {
                    message: format!("entry '{key}': {e}"),
                })?;
            let entry = MappingEntry {
                key,
                target_id: raw_entry.id,
                source: raw_entry.source,
            };
            Self::validate_entry(&entry)?;
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    /// Build a mapping from already-constructed entries, validating each.
    pub fn from_entries(entries: Vec<MappingEntry>) -> Result<Self, MappingError> {
        for entry in &entries {
            Self::validate_entry(entry)?;
        }
        Ok(Self { entries })
    }

    fn validate_entry(entry: &MappingEntry) -> Result<(), MappingError> {
        if let MappingSource::Courses { courses, .. } = &entry.source {
            if courses.is_empty() {
                return Err(MappingError::EmptyCourses {
                    key: entry.key.clone(),
                });
            }
        }
        Ok(())
    }

    /// The mapping entries in file order.
    #[must_use]
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// All distinct target ids referenced by the mapping, in entry order.
    #[must_use]
    pub fn target_ids(&self) -> Vec<TargetId> {
        let mut seen = std::collections::HashSet::new();
        self.entries
            .iter()
            .map(|e| e.target_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// The union of all physical group codes referenced by course-backed
    /// entries. This is the working set requested from the authoritative
    /// source in one bulk fetch.
    #[must_use]
    pub fn course_groups(&self) -> Vec<GroupCode> {
        let mut seen = std::collections::HashSet::new();
        self.entries
            .iter()
            .filter_map(|e| match &e.source {
                MappingSource::Courses { courses, .. } => Some(courses.iter()),
                MappingSource::Program { .. } => None,
            })
            .flatten()
            .filter(|c| seen.insert((*c).clone()))
            .cloned()
            .collect()
    }

    /// The course codes referenced by at least one entry without a
    /// section. Authoritative records for these groups apply across all
    /// sections, so their section qualifier must be blanked before
    /// indexing.
    #[must_use]
    pub fn unsectioned_course_groups(&self) -> std::collections::HashSet<GroupCode> {
        self.entries
            .iter()
            .filter_map(|e| match &e.source {
                MappingSource::Courses {
                    courses,
                    section: None,
                } => Some(courses.iter()),
                _ => None,
            })
            .flatten()
            .cloned()
            .collect()
    }

    /// All distinct program codes referenced by program-backed entries.
    #[must_use]
    pub fn programs(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.entries
            .iter()
            .filter_map(|e| match &e.source {
                MappingSource::Program { program } => Some(program.clone()),
                MappingSource::Courses { .. } => None,
            })
            .filter(|p| seen.insert(p.clone()))
            .collect()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
