//! Authorization data source contract and wire envelopes.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::authz::types::{EffectiveAuthz, Override, SessionUser};

/// Errors raised while fetching catalog or snapshot data.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the connection failed.
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// The body did not have the expected shape.
    #[error("invalid response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    /// An endpoint URL could not be built.
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// The joined fetch did not settle in time.
    #[error("authorization fetch timed out after {0:?}")]
    Timeout(Duration),

    /// Source-specific failure.
    #[error("authorization source unavailable: {0}")]
    Unavailable(String),
}

/// Body of the catalog endpoint: `{ "catalog": { "routes": [...] } }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogPayload {
    pub catalog: CatalogBody,
}

/// Route entries are kept raw so each one can be validated on its own.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogBody {
    #[serde(default)]
    pub routes: Vec<Value>,
}

/// Body of the per-user endpoint: `{ "authz": { "effective": ..., "override": ... } }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthzPayload {
    pub authz: AuthzBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthzBody {
    #[serde(default)]
    pub effective: EffectiveAuthz,

    #[serde(default, rename = "override")]
    pub override_: Option<Override>,
}

/// Supplier of the route catalog and the per-user snapshot.
///
/// Injected into the session so tests can substitute in-memory sources.
pub trait AuthzSource: Send + Sync {
    fn fetch_catalog(&self) -> impl Future<Output = Result<CatalogPayload, FetchError>> + Send;

    fn fetch_authz(
        &self,
        user: &SessionUser,
    ) -> impl Future<Output = Result<AuthzPayload, FetchError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_authz_payload() {
        let payload: AuthzPayload = serde_json::from_value(json!({
            "authz": {
                "effective": {"role": "warden", "routeAccess": {"rooms.view": false}},
                "override": {"grants": ["visitors.approve"]}
            }
        }))
        .unwrap();
        assert_eq!(payload.authz.effective.role.as_deref(), Some("warden"));
        assert_eq!(
            payload.authz.override_,
            Some(Override(json!({"grants": ["visitors.approve"]})))
        );
    }

    #[test]
    fn test_null_override_is_none() {
        let payload: AuthzPayload =
            serde_json::from_value(json!({"authz": {"effective": {}, "override": null}})).unwrap();
        assert!(payload.authz.override_.is_none());
    }

    #[test]
    fn test_decode_catalog_payload_keeps_raw_routes() {
        let payload: CatalogPayload = serde_json::from_value(json!({
            "catalog": {"routes": [{"key": "rooms.view", "paths": ["/rooms"]}, 7]}
        }))
        .unwrap();
        assert_eq!(payload.catalog.routes.len(), 2);
    }
}
