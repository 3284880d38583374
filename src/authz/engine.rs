//! Authorization decisions.
//!
//! # Resolution
//! Explicit user data wins; otherwise the policy default applies. Invalid
//! input always takes the safe branch and nothing here returns an error.
//!
//! ```text
//! can_route:          no record → allow; explicit bool → it; else allow
//! can_route_by_path:  path must resolve to a route key, else deny
//! can:                inactive key → allow; no record → allow;
//!                     specific → wildcard → allow
//! constraint:         present key → stored value (even null/false); else fallback
//! ```
//!
//! # Design Decisions
//! - Pure functions over immutable snapshots (no locks, no side effects)
//! - Unresolvable paths deny while unknown route keys allow; callers rely on
//!   both behaviors

use serde_json::Value;

use crate::authz::capabilities::{explicit_capability, CapabilityAllowlist};
use crate::authz::types::EffectiveAuthz;
use crate::routing::index::CatalogIndex;
use crate::routing::normalize::normalize_key;

/// Whether the user may open the route identified by `route_key`.
pub fn can_route(effective: Option<&EffectiveAuthz>, route_key: &str) -> bool {
    let Some(key) = normalize_key(route_key) else {
        return false;
    };
    let Some(effective) = effective else {
        return true;
    };
    effective.route_access.get(key).copied().unwrap_or(true)
}

/// Whether the user may open `path`.
///
/// Paths that no catalog template covers are denied.
pub fn can_route_by_path(
    index: &CatalogIndex,
    effective: Option<&EffectiveAuthz>,
    path: &str,
) -> bool {
    match index.resolve(path) {
        Some(key) => can_route(effective, key),
        None => false,
    }
}

/// Whether the user may perform `capability`.
pub fn can(
    allowlist: &CapabilityAllowlist,
    effective: Option<&EffectiveAuthz>,
    capability: &str,
) -> bool {
    let Some(key) = normalize_key(capability) else {
        return false;
    };
    if !allowlist.is_active(key) {
        return true;
    }
    let Some(effective) = effective else {
        return true;
    };
    explicit_capability(effective, key).unwrap_or(true)
}

fn active_keys<'k, S: AsRef<str>>(allowlist: &CapabilityAllowlist, keys: &'k [S]) -> Vec<&'k str> {
    keys.iter()
        .filter_map(|k| normalize_key(k.as_ref()))
        .filter(|k| allowlist.is_active(k))
        .collect()
}

/// True if any enforced capability in `keys` passes.
///
/// Empty input is denied. Input with no enforced keys is allowed.
pub fn can_any<S: AsRef<str>>(
    allowlist: &CapabilityAllowlist,
    effective: Option<&EffectiveAuthz>,
    keys: &[S],
) -> bool {
    if keys.is_empty() {
        return false;
    }
    let active = active_keys(allowlist, keys);
    if active.is_empty() {
        return true;
    }
    active.iter().any(|k| can(allowlist, effective, k))
}

/// True if every enforced capability in `keys` passes.
///
/// Empty input is denied. Input with no enforced keys is allowed.
pub fn can_all<S: AsRef<str>>(
    allowlist: &CapabilityAllowlist,
    effective: Option<&EffectiveAuthz>,
    keys: &[S],
) -> bool {
    if keys.is_empty() {
        return false;
    }
    let active = active_keys(allowlist, keys);
    if active.is_empty() {
        return true;
    }
    active.iter().all(|k| can(allowlist, effective, k))
}

/// Stored constraint value, or `fallback` when the key is absent.
///
/// Presence decides, not truthiness: a stored `null`, `false`, `0` or `""`
/// is returned as-is.
pub fn get_constraint(effective: Option<&EffectiveAuthz>, key: &str, fallback: Value) -> Value {
    let Some(key) = normalize_key(key) else {
        return fallback;
    };
    effective
        .and_then(|e| e.constraints.get(key))
        .cloned()
        .unwrap_or(fallback)
}

/// Decision functions bound to one consistent snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Decisions<'a> {
    index: &'a CatalogIndex,
    effective: Option<&'a EffectiveAuthz>,
    allowlist: &'a CapabilityAllowlist,
}

impl<'a> Decisions<'a> {
    pub fn new(
        index: &'a CatalogIndex,
        effective: Option<&'a EffectiveAuthz>,
        allowlist: &'a CapabilityAllowlist,
    ) -> Self {
        Self {
            index,
            effective,
            allowlist,
        }
    }

    pub fn can_route(&self, route_key: &str) -> bool {
        can_route(self.effective, route_key)
    }

    pub fn resolve_route_key_by_path(&self, path: &str) -> Option<&'a str> {
        self.index.resolve(path)
    }

    pub fn can_route_by_path(&self, path: &str) -> bool {
        can_route_by_path(self.index, self.effective, path)
    }

    pub fn can(&self, capability: &str) -> bool {
        can(self.allowlist, self.effective, capability)
    }

    pub fn can_any<S: AsRef<str>>(&self, keys: &[S]) -> bool {
        can_any(self.allowlist, self.effective, keys)
    }

    pub fn can_all<S: AsRef<str>>(&self, keys: &[S]) -> bool {
        can_all(self.allowlist, self.effective, keys)
    }

    pub fn constraint(&self, key: &str, fallback: Value) -> Value {
        get_constraint(self.effective, key, fallback)
    }
}
