//! Authorization snapshot types.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Capability key that applies to every capability without its own entry.
pub const WILDCARD_CAPABILITY: &str = "*";

/// Resolved permissions for the signed-in user.
///
/// A key missing from `route_access` or `capabilities` means "no explicit
/// data", which is not the same as an explicit `false`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveAuthz {
    #[serde(default)]
    pub role: Option<String>,

    #[serde(default, deserialize_with = "bool_entries")]
    pub route_access: HashMap<String, bool>,

    #[serde(default, deserialize_with = "bool_entries")]
    pub capabilities: HashMap<String, bool>,

    #[serde(default)]
    pub constraints: HashMap<String, Value>,
}

impl EffectiveAuthz {
    /// Default record for a role with no granular grants or denials.
    pub fn role_default(role: Option<&str>) -> Self {
        Self {
            role: role.map(str::to_string),
            ..Self::default()
        }
    }
}

/// Keep only entries whose value is a JSON boolean.
///
/// Anything else carries no decision and is treated like a missing key.
fn bool_entries<'de, D>(deserializer: D) -> Result<HashMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| v.as_bool().map(|b| (k, b)))
        .collect())
}

/// User-specific grants/denials as applied by the server.
///
/// Display data only: decisions always go through [`EffectiveAuthz`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Override(pub Value);

/// Authorization data embedded in the user object at sign-in.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct InlineAuthz {
    #[serde(default)]
    pub effective: Option<EffectiveAuthz>,
}

/// The signed-in user as seen by the authorization layer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub authz: Option<InlineAuthz>,

    /// Bearer credential for the authorization endpoints.
    #[serde(skip)]
    pub token: Option<String>,
}

impl SessionUser {
    pub fn with_role(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            ..Self::default()
        }
    }

    /// Record used before the network snapshot arrives.
    pub fn initial_effective(&self) -> EffectiveAuthz {
        self.authz
            .as_ref()
            .and_then(|a| a.effective.clone())
            .unwrap_or_else(|| self.role_default())
    }

    /// Record used when the snapshot cannot be fetched.
    pub fn role_default(&self) -> EffectiveAuthz {
        EffectiveAuthz::role_default(self.role.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_boolean_access_entries_dropped() {
        let effective: EffectiveAuthz = serde_json::from_value(json!({
            "role": "warden",
            "routeAccess": {"rooms.view": true, "visitors.log": "yes", "gate.entries": false},
            "capabilities": {"*": false, "rooms.allot": 1},
            "constraints": {"hostelIds": ["H1"], "maxVisitors": null}
        }))
        .unwrap();

        assert_eq!(effective.role.as_deref(), Some("warden"));
        assert_eq!(effective.route_access.len(), 2);
        assert_eq!(effective.route_access.get("gate.entries"), Some(&false));
        assert!(!effective.route_access.contains_key("visitors.log"));
        assert_eq!(effective.capabilities.len(), 1);
        assert!(effective.constraints.contains_key("maxVisitors"));
    }

    #[test]
    fn test_missing_and_null_tables() {
        let effective: EffectiveAuthz =
            serde_json::from_value(json!({"routeAccess": null})).unwrap();
        assert_eq!(effective, EffectiveAuthz::default());
    }

    #[test]
    fn test_initial_effective_prefers_inline_record() {
        let user: SessionUser = serde_json::from_value(json!({
            "id": "u1",
            "role": "student",
            "authz": {"effective": {"routeAccess": {"rooms.view": false}}}
        }))
        .unwrap();
        assert_eq!(user.initial_effective().route_access.get("rooms.view"), Some(&false));

        let plain = SessionUser::with_role("guard");
        let initial = plain.initial_effective();
        assert_eq!(initial.role.as_deref(), Some("guard"));
        assert!(initial.route_access.is_empty());
    }

    #[test]
    fn test_token_never_serialized() {
        let user = SessionUser {
            token: Some("secret".into()),
            ..SessionUser::with_role("admin")
        };
        let text = serde_json::to_string(&user).unwrap();
        assert!(!text.contains("secret"));
    }
}
