//! Cross-list aggregation: one logical group's authoritative membership.

use std::collections::HashSet;

use rosync_roster::ids::MemberId;
use rosync_roster::index::RosterIndex;
use rosync_roster::mapping::MappingEntry;
use rosync_roster::role::Role;

/// Combine the authoritative member sets of every source group behind a
/// mapping entry, for one role.
///
/// A cross-listed logical group is the union of its constituent physical
/// sections. The entry's section key applies to every source group; a
/// `(group, section)` pair absent from the index contributes the empty
/// set rather than failing — a group with zero enrolled members is
/// valid.
#[must_use]
pub fn combine_rosters(
    entry: &MappingEntry,
    role: Role,
    index: &RosterIndex,
) -> HashSet<MemberId> {
    let section_key = entry.section_key();
    let mut combined = HashSet::new();
    for group in entry.source_groups() {
        if let Some(members) = index.members(&group, section_key, role) {
            combined.extend(members.iter().cloned());
        }
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosync_roster::mapping::{MappingSource, Mapping};
    use rosync_roster::record::RosterRecord;

    fn entry(json: &str) -> MappingEntry {
        Mapping::from_json(json).unwrap().entries()[0].clone()
    }

    fn index(records: Vec<RosterRecord>) -> RosterIndex {
        RosterIndex::build(records)
    }

    #[test]
    fn test_crosslist_union() {
        // A: {1, 2}, B: {2, 3} -> {1, 2, 3}
        let idx = index(vec![
            RosterRecord::new("A", Role::Member, "1"),
            RosterRecord::new("A", Role::Member, "2"),
            RosterRecord::new("B", Role::Member, "2"),
            RosterRecord::new("B", Role::Member, "3"),
        ]);
        let e = entry(r#"{ "X": { "courses": ["A", "B"], "id": 1 } }"#);

        let combined = combine_rosters(&e, Role::Member, &idx);
        let expected: HashSet<MemberId> =
            ["1", "2", "3"].iter().map(|s| MemberId::new(*s)).collect();
        assert_eq!(combined, expected);
    }

    #[test]
    fn test_missing_group_contributes_empty_set() {
        let idx = index(vec![RosterRecord::new("A", Role::Member, "1")]);
        let e = entry(r#"{ "X": { "courses": ["A", "GHOST"], "id": 1 } }"#);

        let combined = combine_rosters(&e, Role::Member, &idx);
        assert_eq!(combined.len(), 1);
    }

    #[test]
    fn test_entirely_missing_entry_is_empty_not_error() {
        let idx = index(vec![]);
        let e = entry(r#"{ "X": { "courses": ["GHOST"], "id": 1 } }"#);
        assert!(combine_rosters(&e, Role::Member, &idx).is_empty());
    }

    #[test]
    fn test_section_key_applied_to_every_source_group() {
        let idx = index(vec![
            RosterRecord::new("A", Role::Member, "1").with_subgroup("01"),
            // Section 02 must not leak into a section-01 entry.
            RosterRecord::new("B", Role::Member, "9").with_subgroup("02"),
            RosterRecord::new("B", Role::Member, "2").with_subgroup("01"),
        ]);
        let e = entry(r#"{ "X": { "courses": ["A", "B"], "section": "01", "id": 1 } }"#);

        let combined = combine_rosters(&e, Role::Member, &idx);
        let expected: HashSet<MemberId> = ["1", "2"].iter().map(|s| MemberId::new(*s)).collect();
        assert_eq!(combined, expected);
    }

    #[test]
    fn test_roles_kept_independent() {
        let idx = index(vec![
            RosterRecord::new("A", Role::Member, "1"),
            RosterRecord::new("A", Role::AuditingMember, "2"),
        ]);
        let e = entry(r#"{ "X": { "courses": ["A"], "id": 1 } }"#);

        assert!(combine_rosters(&e, Role::Member, &idx).contains(&MemberId::new("1")));
        let auditing = combine_rosters(&e, Role::AuditingMember, &idx);
        assert!(auditing.contains(&MemberId::new("2")));
        assert!(!auditing.contains(&MemberId::new("1")));
    }

    #[test]
    fn test_program_entry_combines_under_program_code() {
        let idx = index(vec![RosterRecord::new("CHIRO", Role::Member, "1")]);
        let e = entry(r#"{ "X": { "program": "CHIRO", "id": 1 } }"#);
        assert!(matches!(e.source, MappingSource::Program { .. }));

        let combined = combine_rosters(&e, Role::Member, &idx);
        assert!(combined.contains(&MemberId::new("1")));
    }
}
