//! HTTP client for the web-services roster endpoint.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace};

use rosync_roster::error::FetchError;
use rosync_roster::ids::{MemberId, TargetId};
use rosync_roster::outcome::RoleMembership;

use crate::config::WebServicesConfig;

/// One enrolled user in the raw web-services response.
///
/// The endpoint returns far more per user; everything except the id
/// number and role designators is ignored. `idnumber` arrives as either
/// a JSON string or a number depending on the target's data hygiene.
#[derive(Debug, Deserialize)]
struct WsEnrolledUser {
    #[serde(default)]
    idnumber: Option<serde_json::Value>,
    #[serde(default)]
    roles: Vec<WsRole>,
}

#[derive(Debug, Deserialize)]
struct WsRole {
    roleid: i64,
}

impl WsEnrolledUser {
    /// The id number as a uniform string, or `None` when absent/empty.
    fn idnumber_str(&self) -> Option<String> {
        match &self.idnumber {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    fn has_role(&self, role_id: i64) -> bool {
        self.roles.iter().any(|r| r.roleid == role_id)
    }
}

/// Client for the target's web-services REST endpoint.
///
/// Issues one form-encoded POST per group id and partitions each
/// response by role designator.
#[derive(Debug, Clone)]
pub struct WebServicesClient {
    config: WebServicesConfig,
    client: Client,
}

impl WebServicesClient {
    /// Build a client from configuration.
    pub fn new(config: WebServicesConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::network_with_source("failed to build HTTP client", e))?;
        Ok(Self { config, client })
    }

    /// The configuration (token redacted on Debug).
    #[must_use]
    pub fn config(&self) -> &WebServicesConfig {
        &self.config
    }

    /// Fetch one group's roster and partition it by role.
    ///
    /// Every failure mode — transport error, timeout, non-2xx status,
    /// unparseable body, or the service's error envelope — maps to a
    /// [`FetchError`]; callers convert it to a per-id outcome.
    pub async fn fetch_roster(&self, id: TargetId) -> Result<RoleMembership, FetchError> {
        debug!(target_id = %id, function = %self.config.ws_function, "fetching target roster");

        let id_param = id.to_string();
        let params = [
            ("wstoken", self.config.token.as_str()),
            ("wsfunction", self.config.ws_function.as_str()),
            ("moodlewsrestformat", "json"),
            (self.config.param_key.as_str(), id_param.as_str()),
        ];

        let response = self
            .client
            .post(self.config.endpoint_url())
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout {
                        secs: self.config.timeout_secs,
                    }
                } else {
                    FetchError::network_with_source("request failed", e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| FetchError::invalid_payload(format!("response is not JSON: {e}")))?;

        // The endpoint signals errors in-band with a 200 and an
        // exception envelope instead of a user array.
        if let Some(envelope) = body.as_object() {
            if envelope.contains_key("exception") {
                let code = envelope
                    .get("errorcode")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown")
                    .to_string();
                let message = envelope
                    .get("message")
                    .and_then(|v| v.as_str())
                    .unwrap_or("service exception")
                    .to_string();
                return Err(FetchError::Service { code, message });
            }
        }

        let users: Vec<WsEnrolledUser> = serde_json::from_value(body)
            .map_err(|e| FetchError::invalid_payload(format!("unexpected response shape: {e}")))?;

        Ok(self.partition_roster(id, &users))
    }

    /// Partition a raw user list into per-role member sets.
    ///
    /// A user without an id number, or with an id that normalizes to
    /// empty, or without a recognized role designator, is silently
    /// excluded.
    fn partition_roster(&self, id: TargetId, users: &[WsEnrolledUser]) -> RoleMembership {
        let scheme = self.config.role_scheme;
        let mut membership = RoleMembership::new();

        for user in users {
            let Some(raw) = user.idnumber_str() else {
                continue;
            };
            let member = MemberId::normalize(&raw, self.config.id_marker);
            if member.is_empty() {
                continue;
            }
            if user.has_role(scheme.primary_role_id) {
                membership.members.insert(member.clone());
            }
            if user.has_role(scheme.auditing_role_id) {
                membership.auditing.insert(member);
            }
        }

        trace!(
            target_id = %id,
            raw_users = users.len(),
            members = membership.members.len(),
            auditing = membership.auditing.len(),
            "partitioned target roster"
        );
        membership
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> WebServicesClient {
        WebServicesClient::new(
            WebServicesConfig::new("https://lms.example.edu/", "t").with_id_marker('P'),
        )
        .unwrap()
    }

    fn user(idnumber: serde_json::Value, role_ids: &[i64]) -> WsEnrolledUser {
        WsEnrolledUser {
            idnumber: Some(idnumber),
            roles: role_ids.iter().map(|&roleid| WsRole { roleid }).collect(),
        }
    }

    #[test]
    fn test_partition_filters_by_designator() {
        let users = vec![
            user(serde_json::json!("P100"), &[5]),
            user(serde_json::json!("P200"), &[14]),
            user(serde_json::json!("P300"), &[5, 14]),
        ];
        let m = client().partition_roster(TargetId::new(1), &users);

        assert!(m.members.contains(&MemberId::new("100")));
        assert!(m.members.contains(&MemberId::new("300")));
        assert!(!m.members.contains(&MemberId::new("200")));
        assert!(m.auditing.contains(&MemberId::new("200")));
        assert!(m.auditing.contains(&MemberId::new("300")));
    }

    #[test]
    fn test_unrecognized_designator_excluded_from_both() {
        // roleid 3 is a teacher; present in the raw response but in
        // neither role set.
        let users = vec![user(serde_json::json!("P400"), &[3])];
        let m = client().partition_roster(TargetId::new(1), &users);
        assert!(m.members.is_empty());
        assert!(m.auditing.is_empty());
    }

    #[test]
    fn test_missing_or_empty_idnumber_excluded() {
        let users = vec![
            WsEnrolledUser {
                idnumber: None,
                roles: vec![WsRole { roleid: 5 }],
            },
            user(serde_json::json!(""), &[5]),
            user(serde_json::json!("P"), &[5]),
        ];
        let m = client().partition_roster(TargetId::new(1), &users);
        assert!(m.members.is_empty());
    }

    #[test]
    fn test_numeric_idnumber_stringified() {
        let users = vec![user(serde_json::json!(100), &[5])];
        let m = client().partition_roster(TargetId::new(1), &users);
        assert!(m.members.contains(&MemberId::new("100")));
    }
}
