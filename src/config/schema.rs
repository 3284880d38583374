//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! authorization client. All types derive Serde traits for deserialization
//! from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::authz::capabilities::{CapabilityAllowlist, DEFAULT_ACTIVE_CAPABILITIES};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthzConfig {
    /// Hostel API endpoints and credentials.
    pub api: ApiConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Staged capability enforcement.
    pub enforcement: EnforcementConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Hostel API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the API (e.g., "http://localhost:5000").
    pub base_url: String,

    /// Path of the route catalog endpoint.
    pub catalog_path: String,

    /// Path of the per-user authorization endpoint.
    pub authz_path: String,

    /// Bearer token used when the signed-in user carries none.
    pub bearer_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            catalog_path: "/api/authz/catalog".to_string(),
            authz_path: "/api/authz/me".to_string(),
            bearer_token: None,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Bound on the joined catalog + snapshot fetch in seconds (0 = unbounded).
    pub fetch_secs: u64,
}

impl TimeoutConfig {
    pub fn fetch_timeout(&self) -> Option<Duration> {
        if self.fetch_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.fetch_secs))
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { fetch_secs: 15 }
    }
}

/// Capability keys currently under real enforcement.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EnforcementConfig {
    pub active_capabilities: Vec<String>,
}

impl EnforcementConfig {
    pub fn allowlist(&self) -> CapabilityAllowlist {
        CapabilityAllowlist::new(&self.active_capabilities)
    }
}

impl Default for EnforcementConfig {
    fn default() -> Self {
        Self {
            active_capabilities: DEFAULT_ACTIVE_CAPABILITIES
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
