//! Concurrent per-group roster fetching with isolated failures.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use rosync_roster::error::FetchError;
use rosync_roster::ids::TargetId;
use rosync_roster::outcome::{FetchOutcome, TargetRosters};
use rosync_roster::traits::TargetRosterService;

use crate::client::WebServicesClient;
use crate::config::WebServicesConfig;

/// Fetches target rosters over the web-services API, one task per group
/// id.
///
/// Tasks are multiplexed on the tokio runtime, so an arbitrarily large
/// id set never requires unbounded native threads. Each task owns its
/// own result; error aggregation happens after the join, never through a
/// collection shared across tasks. A failed id is final for the pass —
/// no automatic retries.
pub struct RestRosterFetcher {
    client: WebServicesClient,
}

impl RestRosterFetcher {
    /// Build a fetcher from configuration.
    pub fn new(config: WebServicesConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: WebServicesClient::new(config)?,
        })
    }

    /// Build a fetcher around an existing client.
    #[must_use]
    pub fn with_client(client: WebServicesClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TargetRosterService for RestRosterFetcher {
    async fn fetch_rosters(&self, ids: &[TargetId]) -> TargetRosters {
        let mut join_set = JoinSet::new();
        for &id in ids {
            let client = self.client.clone();
            join_set.spawn(async move { (id, client.fetch_roster(id).await) });
        }

        let mut outcomes: HashMap<TargetId, FetchOutcome> = HashMap::with_capacity(ids.len());
        while let Some(join_result) = join_set.join_next().await {
            match join_result {
                Ok((id, Ok(membership))) => {
                    outcomes.insert(id, FetchOutcome::Success(membership));
                }
                Ok((id, Err(err))) => {
                    // The consumer reports failures with pass context;
                    // log here at debug only.
                    debug!(target_id = %id, error = %err, "roster fetch failed");
                    outcomes.insert(id, FetchOutcome::Failed(err));
                }
                Err(join_err) => {
                    // A panicked task loses its id, so it cannot be
                    // recorded per-id; surface it loudly instead.
                    warn!(error = %join_err, "roster fetch task panicked");
                }
            }
        }

        // Cover ids whose task never produced an outcome (panic above).
        for &id in ids {
            outcomes
                .entry(id)
                .or_insert_with(|| FetchOutcome::Failed(FetchError::network("fetch task failed")));
        }

        TargetRosters::new(outcomes)
    }
}
