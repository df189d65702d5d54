//! Configuration for the web-services roster connector.

use serde::{Deserialize, Serialize};

/// Numeric role designators used by the target system.
///
/// An enrolled user may carry several designators; the fetcher filters
/// the raw roster once per configured designator. Users carrying
/// neither are excluded from both role sets (not an error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleScheme {
    /// Designator for the primary (regularly enrolled) role.
    pub primary_role_id: i64,
    /// Designator for the auditing role.
    pub auditing_role_id: i64,
}

impl Default for RoleScheme {
    fn default() -> Self {
        // Stock LMS role ids: 5 = student, 14 = auditing student.
        Self {
            primary_role_id: 5,
            auditing_role_id: 14,
        }
    }
}

/// Configuration for [`crate::WebServicesClient`].
#[derive(Clone, Serialize, Deserialize)]
pub struct WebServicesConfig {
    /// Base URL of the target system, e.g. `https://lms.example.edu/`.
    pub base_url: String,
    /// Path of the web-services endpoint, relative to the base URL.
    pub endpoint: String,
    /// Web-services authentication token.
    pub token: String,
    /// Name of the web-service function that returns enrolled users.
    pub ws_function: String,
    /// Name of the request parameter carrying the group id.
    pub param_key: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Marker character stripped from raw member ids, if any.
    pub id_marker: Option<char>,
    /// Role designator scheme.
    pub role_scheme: RoleScheme,
}

impl WebServicesConfig {
    /// Create a configuration with the stock endpoint, function, and
    /// parameter names.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            endpoint: "webservice/rest/server.php".to_string(),
            token: token.into(),
            ws_function: "core_enrol_get_enrolled_users".to_string(),
            param_key: "courseid".to_string(),
            timeout_secs: 30,
            id_marker: None,
            role_scheme: RoleScheme::default(),
        }
    }

    /// Override the endpoint path.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the web-service function name.
    #[must_use]
    pub fn with_function(mut self, ws_function: impl Into<String>) -> Self {
        self.ws_function = ws_function.into();
        self
    }

    /// Override the group-id parameter name.
    #[must_use]
    pub fn with_param_key(mut self, param_key: impl Into<String>) -> Self {
        self.param_key = param_key.into();
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the member-id marker character to strip.
    #[must_use]
    pub fn with_id_marker(mut self, marker: char) -> Self {
        self.id_marker = Some(marker);
        self
    }

    /// Override the role designator scheme.
    #[must_use]
    pub fn with_role_scheme(mut self, scheme: RoleScheme) -> Self {
        self.role_scheme = scheme;
        self
    }

    /// The full endpoint URL.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{}/{}", base, self.endpoint.trim_start_matches('/'))
    }

    /// Copy with the token replaced, for logging.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.token = "***".to_string();
        copy
    }
}

// Manual Debug so the token can never leak into logs.
impl std::fmt::Debug for WebServicesConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebServicesConfig")
            .field("base_url", &self.base_url)
            .field("endpoint", &self.endpoint)
            .field("token", &"***")
            .field("ws_function", &self.ws_function)
            .field("param_key", &self.param_key)
            .field("timeout_secs", &self.timeout_secs)
            .field("id_marker", &self.id_marker)
            .field("role_scheme", &self.role_scheme)
            .finish()
    }
}
