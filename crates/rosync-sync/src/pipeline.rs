//! The reconciliation pipeline: one full pass from mapping to report.

use std::sync::Arc;

use chrono::Utc;

use rosync_roster::mapping::Mapping;
use rosync_roster::outcome::FetchOutcome;
use rosync_roster::traits::{Period, TargetRosterService};

use crate::error::SyncResult;
use crate::report::{SkippedEntry, SyncReport, SyncStats};
use crate::strategy::ReconciliationStrategy;

/// Runs one reconciliation pass.
///
/// The authoritative roster is fetched in one bulk operation before any
/// per-entry work; a source failure aborts the pass with no partial
/// output. Target rosters are fetched concurrently and a failure on one
/// id only skips the entries backed by that id.
pub struct ReconciliationPipeline {
    strategy: Arc<dyn ReconciliationStrategy>,
    targets: Arc<dyn TargetRosterService>,
    period: Period,
}

impl ReconciliationPipeline {
    /// Create a pipeline for one period.
    pub fn new(
        strategy: Arc<dyn ReconciliationStrategy>,
        targets: Arc<dyn TargetRosterService>,
        period: Period,
    ) -> Self {
        Self {
            strategy,
            targets,
            period,
        }
    }

    /// Run one pass over the mapping and return the delta report.
    ///
    /// Entries whose target fetch failed contribute zero delta records
    /// and appear in the report's skipped list; a stale roster must
    /// never be mistaken for an empty one.
    pub async fn run(&self, mapping: &Mapping) -> SyncResult<SyncReport> {
        let started_at = Utc::now();
        tracing::info!(
            period = %self.period.term_year(),
            entries = mapping.len(),
            "starting reconciliation pass"
        );

        let index = self.strategy.fetch_authoritative(&self.period, mapping).await?;

        let ids = mapping.target_ids();
        let rosters = self.targets.fetch_rosters(&ids).await;
        for (id, err) in rosters.failures() {
            tracing::warn!(target_id = %id, error = %err, "target roster fetch failed");
        }

        let mut deltas = Vec::new();
        let mut skipped = Vec::new();
        let mut stats = SyncStats {
            entries_total: mapping.len(),
            ..SyncStats::default()
        };

        for entry in mapping.entries() {
            let membership = match rosters.outcome(entry.target_id) {
                Some(FetchOutcome::Success(membership)) => membership,
                Some(FetchOutcome::Failed(err)) => {
                    stats.entries_skipped += 1;
                    skipped.push(SkippedEntry {
                        key: entry.key.clone(),
                        target_id: entry.target_id,
                        reason: err.to_string(),
                    });
                    continue;
                }
                // The service contract covers every requested id; treat a
                // hole like a failed fetch rather than an empty roster.
                None => {
                    stats.entries_skipped += 1;
                    skipped.push(SkippedEntry {
                        key: entry.key.clone(),
                        target_id: entry.target_id,
                        reason: "no fetch outcome returned".to_string(),
                    });
                    continue;
                }
            };

            let records = self.strategy.compute_entry_deltas(entry, &index, membership);
            for record in &records {
                stats.add_record(record);
            }
            deltas.extend(records);
        }

        let finished_at = Utc::now();
        tracing::info!(
            adds = stats.adds,
            drops = stats.drops,
            skipped = stats.entries_skipped,
            "reconciliation pass complete"
        );

        Ok(SyncReport::new(deltas, skipped, stats, started_at, finished_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use rosync_roster::async_trait;
    use rosync_roster::delta::DeltaAction;
    use rosync_roster::error::{FetchError, SourceError};
    use rosync_roster::ids::{GroupCode, MemberId, TargetId};
    use rosync_roster::outcome::{RoleMembership, TargetRosters};
    use rosync_roster::record::RosterRecord;
    use rosync_roster::role::Role;

    use crate::error::SyncError;
    use crate::strategy::CourseSyncStrategy;

    struct StubSource {
        records: Vec<RosterRecord>,
        fail: Option<SourceError>,
    }

    impl StubSource {
        fn with_records(records: Vec<RosterRecord>) -> Self {
            Self {
                records,
                fail: None,
            }
        }

        fn failing(err: SourceError) -> Self {
            Self {
                records: Vec::new(),
                fail: Some(err),
            }
        }
    }

    #[async_trait]
    impl rosync_roster::traits::AuthoritativeSource for StubSource {
        async fn fetch_group_records(
            &self,
            _period: &Period,
            _groups: &[GroupCode],
        ) -> Result<Vec<RosterRecord>, SourceError> {
            match &self.fail {
                Some(SourceError::AmbiguousResult { context }) => {
                    Err(SourceError::ambiguous(context.clone()))
                }
                Some(SourceError::Query { message, .. }) => Err(SourceError::query(message.clone())),
                None => Ok(self.records.clone()),
            }
        }

        async fn fetch_program_records(
            &self,
            _period: &Period,
            _programs: &[String],
        ) -> Result<Vec<RosterRecord>, SourceError> {
            Ok(self.records.clone())
        }
    }

    struct StubTargets {
        ok: HashMap<TargetId, RoleMembership>,
        fail: Vec<TargetId>,
    }

    #[async_trait]
    impl TargetRosterService for StubTargets {
        async fn fetch_rosters(&self, ids: &[TargetId]) -> TargetRosters {
            let mut outcomes = HashMap::new();
            for id in ids {
                if self.fail.contains(id) {
                    outcomes.insert(*id, FetchOutcome::Failed(FetchError::Http { status: 502 }));
                } else if let Some(m) = self.ok.get(id) {
                    outcomes.insert(*id, FetchOutcome::Success(m.clone()));
                } else {
                    outcomes.insert(*id, FetchOutcome::Success(RoleMembership::new()));
                }
            }
            TargetRosters::new(outcomes)
        }
    }

    fn membership(members: &[&str]) -> RoleMembership {
        let mut m = RoleMembership::new();
        m.members = members.iter().map(|s| MemberId::new(*s)).collect();
        m
    }

    fn pipeline(source: StubSource, targets: StubTargets) -> ReconciliationPipeline {
        ReconciliationPipeline::new(
            Arc::new(CourseSyncStrategy::new(Arc::new(source))),
            Arc::new(targets),
            Period::new("Winter", "2024"),
        )
    }

    const TWO_ENTRIES: &str = r#"{
        "ANAT611-24W": { "courses": ["ANAT611"], "id": 1 },
        "PHIL500-24W": { "courses": ["PHIL500"], "id": 2 }
    }"#;

    #[tokio::test]
    async fn test_full_pass_emits_adds_and_drops() {
        let source = StubSource::with_records(vec![
            RosterRecord::new("ANAT611", Role::Member, "100"),
            RosterRecord::new("ANAT611", Role::Member, "101"),
            RosterRecord::new("PHIL500", Role::Member, "200"),
        ]);
        let targets = StubTargets {
            ok: HashMap::from([
                // 100 present, 101 missing, 999 extra
                (TargetId::new(1), membership(&["100", "999"])),
                (TargetId::new(2), membership(&["200"])),
            ]),
            fail: vec![],
        };
        let mapping = Mapping::from_json(TWO_ENTRIES).unwrap();

        let report = pipeline(source, targets).run(&mapping).await.unwrap();

        let stats = report.stats();
        assert_eq!(stats.entries_total, 2);
        assert_eq!(stats.entries_skipped, 0);
        assert_eq!(stats.adds, 1);
        assert_eq!(stats.drops, 1);

        let add = report
            .deltas()
            .iter()
            .find(|r| r.action == DeltaAction::Add)
            .unwrap();
        assert_eq!(add.key, "ANAT611-24W");
        assert_eq!(add.member, MemberId::new("101"));

        let drop = report
            .deltas()
            .iter()
            .find(|r| r.action == DeltaAction::Drop)
            .unwrap();
        assert_eq!(drop.member, MemberId::new("999"));
    }

    #[tokio::test]
    async fn test_failed_entry_skipped_without_poisoning_others() {
        let source = StubSource::with_records(vec![
            RosterRecord::new("ANAT611", Role::Member, "100"),
            RosterRecord::new("PHIL500", Role::Member, "200"),
        ]);
        let targets = StubTargets {
            ok: HashMap::from([(TargetId::new(2), membership(&[]))]),
            fail: vec![TargetId::new(1)],
        };
        let mapping = Mapping::from_json(TWO_ENTRIES).unwrap();

        let report = pipeline(source, targets).run(&mapping).await.unwrap();

        // The failed entry contributed nothing, not drops for everyone.
        assert!(report.deltas().iter().all(|r| r.key == "PHIL500-24W"));
        assert_eq!(report.stats().adds, 1);

        assert_eq!(report.skipped().len(), 1);
        let skipped = &report.skipped()[0];
        assert_eq!(skipped.key, "ANAT611-24W");
        assert_eq!(skipped.target_id, TargetId::new(1));
        assert!(skipped.reason.contains("502"));
    }

    #[tokio::test]
    async fn test_source_failure_aborts_pass() {
        let source = StubSource::failing(SourceError::ambiguous("duplicate term row"));
        let targets = StubTargets {
            ok: HashMap::new(),
            fail: vec![],
        };
        let mapping = Mapping::from_json(TWO_ENTRIES).unwrap();

        let err = pipeline(source, targets).run(&mapping).await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::Source(SourceError::AmbiguousResult { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_mapping_yields_empty_report() {
        let source = StubSource::with_records(vec![]);
        let targets = StubTargets {
            ok: HashMap::new(),
            fail: vec![],
        };
        let mapping = Mapping::from_json("{}").unwrap();

        let report = pipeline(source, targets).run(&mapping).await.unwrap();
        assert!(report.is_empty());
        assert_eq!(report.stats().entries_total, 0);
    }

    #[tokio::test]
    async fn test_crosslisted_entry_unions_before_diffing() {
        let source = StubSource::with_records(vec![
            RosterRecord::new("ANAT611", Role::Member, "100"),
            RosterRecord::new("ANAT611L", Role::Member, "101"),
        ]);
        let targets = StubTargets {
            ok: HashMap::from([(TargetId::new(7), membership(&["100"]))]),
            fail: vec![],
        };
        let mapping = Mapping::from_json(
            r#"{ "ANAT611-24W": { "courses": ["ANAT611", "ANAT611L"], "id": 7 } }"#,
        )
        .unwrap();

        let report = pipeline(source, targets).run(&mapping).await.unwrap();

        // 100 is already enrolled through the first constituent, so only
        // 101 is added and nothing is dropped.
        assert_eq!(report.deltas().len(), 1);
        assert_eq!(report.deltas()[0].action, DeltaAction::Add);
        assert_eq!(report.deltas()[0].member, MemberId::new("101"));
    }

    #[tokio::test]
    async fn test_timestamps_ordered() {
        let source = StubSource::with_records(vec![]);
        let targets = StubTargets {
            ok: HashMap::new(),
            fail: vec![],
        };
        let mapping = Mapping::from_json("{}").unwrap();

        let report = pipeline(source, targets).run(&mapping).await.unwrap();
        assert!(report.started_at <= report.finished_at);
    }
}
