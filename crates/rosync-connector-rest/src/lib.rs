//! # Web-Services Roster Connector
//!
//! Fetches per-group enrollment rosters from an LMS-style web-services
//! REST endpoint and partitions them by role.
//!
//! Each group is fetched in its own task; a failure on one group id —
//! network error, non-2xx status, malformed payload, or the service's
//! error envelope — is recorded as a per-id outcome and never prevents
//! results for the other ids.
//!
//! ## Example
//!
//! ```ignore
//! use rosync_connector_rest::{RestRosterFetcher, WebServicesConfig};
//! use rosync_roster::prelude::*;
//!
//! let config = WebServicesConfig::new("https://lms.example.edu/", "ws-token");
//! let fetcher = RestRosterFetcher::new(config)?;
//! let rosters = fetcher.fetch_rosters(&ids).await;
//! for (id, err) in rosters.failures() {
//!     tracing::warn!(target_id = %id, error = %err, "roster fetch failed");
//! }
//! ```

pub mod client;
pub mod config;
pub mod fetcher;

// Re-exports
pub use client::WebServicesClient;
pub use config::{RoleScheme, WebServicesConfig};
pub use fetcher::RestRosterFetcher;
