//! Delta output: conduit CSV serialization and stream delivery.

use std::collections::BTreeMap;

use serde::Serialize;

use rosync_roster::delta::DeltaRecord;
use rosync_roster::traits::DeltaSink;

use crate::error::{SyncError, SyncResult};

/// The standard stream name for enrollment deltas.
pub const ENROLLMENTS_STREAM: &str = "enrollments";

/// One conduit CSV row. Column order matters to the consumer.
#[derive(Serialize)]
struct ConduitRow<'a> {
    action: String,
    shortname: &'a str,
    idnumber: &'a str,
    role: &'a str,
}

impl<'a> From<&'a DeltaRecord> for ConduitRow<'a> {
    fn from(record: &'a DeltaRecord) -> Self {
        Self {
            action: record.action.to_string(),
            shortname: &record.key,
            idnumber: record.member.as_str(),
            role: record.role.as_str(),
        }
    }
}

/// Serializes delta records into the conduit CSV format consumed by the
/// target system's bulk enrollment tool.
///
/// Header row `action,shortname,idnumber,role`, one row per record.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConduitCsvFormatter;

impl ConduitCsvFormatter {
    /// Serialize one stream's records into a CSV payload.
    pub fn format(&self, stream: &str, records: &[DeltaRecord]) -> SyncResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in records {
            writer
                .serialize(ConduitRow::from(record))
                .map_err(|e| SyncError::csv(stream, e.to_string()))?;
        }
        writer
            .into_inner()
            .map_err(|e| SyncError::csv(stream, e.to_string()))
    }
}

/// Delta records partitioned into named delivery streams.
///
/// Stream names are stable across passes so the consumer can key its
/// pickup on them. An empty stream is delivered as nothing at all, not
/// as a header-only file.
#[derive(Debug, Default)]
pub struct DeltaStreams {
    streams: BTreeMap<String, Vec<DeltaRecord>>,
}

impl DeltaStreams {
    /// Create an empty stream set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named stream.
    #[must_use]
    pub fn with_stream(mut self, name: impl Into<String>, records: Vec<DeltaRecord>) -> Self {
        self.streams.insert(name.into(), records);
        self
    }

    /// The records in one stream, if present.
    #[must_use]
    pub fn stream(&self, name: &str) -> Option<&[DeltaRecord]> {
        self.streams.get(name).map(Vec::as_slice)
    }

    /// Serialize every non-empty stream and deliver it through the sink.
    pub async fn push_to(&self, sink: &dyn DeltaSink) -> SyncResult<()> {
        let formatter = ConduitCsvFormatter;
        for (name, records) in &self.streams {
            if records.is_empty() {
                tracing::debug!(stream = %name, "stream empty, nothing to deliver");
                continue;
            }
            let payload = formatter.format(name, records)?;
            sink.put(name, &payload).await?;
            tracing::info!(stream = %name, records = records.len(), "delivered delta stream");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosync_roster::ids::MemberId;
    use rosync_roster::role::Role;
    use rosync_roster::traits::SinkError;
    use std::sync::Mutex;

    fn records() -> Vec<DeltaRecord> {
        vec![
            DeltaRecord::add("ANAT611-24W", MemberId::new("100"), Role::Member),
            DeltaRecord::drop("ANAT611-24W", MemberId::new("200"), Role::AuditingMember),
        ]
    }

    #[test]
    fn test_conduit_format() {
        let payload = ConduitCsvFormatter
            .format(ENROLLMENTS_STREAM, &records())
            .unwrap();
        let text = String::from_utf8(payload).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("action,shortname,idnumber,role"));
        assert_eq!(lines.next(), Some("add,ANAT611-24W,100,student"));
        assert_eq!(
            lines.next(),
            Some("drop,ANAT611-24W,200,auditingstudent")
        );
        assert_eq!(lines.next(), None);
    }

    struct CaptureSink {
        puts: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl CaptureSink {
        fn new() -> Self {
            Self {
                puts: Mutex::new(Vec::new()),
            }
        }
    }

    #[rosync_roster::async_trait]
    impl DeltaSink for CaptureSink {
        async fn put(&self, stream: &str, payload: &[u8]) -> Result<(), SinkError> {
            self.puts
                .lock()
                .unwrap()
                .push((stream.to_string(), payload.to_vec()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_push_delivers_named_streams() {
        let sink = CaptureSink::new();
        let streams = DeltaStreams::new().with_stream(ENROLLMENTS_STREAM, records());

        streams.push_to(&sink).await.unwrap();

        let puts = sink.puts.lock().unwrap();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].0, ENROLLMENTS_STREAM);
        assert!(!puts[0].1.is_empty());
    }

    #[tokio::test]
    async fn test_empty_stream_not_delivered() {
        let sink = CaptureSink::new();
        let streams = DeltaStreams::new().with_stream(ENROLLMENTS_STREAM, Vec::new());

        streams.push_to(&sink).await.unwrap();

        assert!(sink.puts.lock().unwrap().is_empty());
    }

    struct FailingSink;

    #[rosync_roster::async_trait]
    impl DeltaSink for FailingSink {
        async fn put(&self, stream: &str, _payload: &[u8]) -> Result<(), SinkError> {
            Err(SinkError::new(stream, "connection refused"))
        }
    }

    #[tokio::test]
    async fn test_sink_failure_surfaces() {
        let streams = DeltaStreams::new().with_stream(ENROLLMENTS_STREAM, records());
        let err = streams.push_to(&FailingSink).await.unwrap_err();
        assert!(matches!(err, SyncError::Sink(_)));
    }
}
