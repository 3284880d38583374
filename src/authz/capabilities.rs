//! Staged capability enforcement.
//!
//! Only capabilities on the active allowlist are evaluated against the
//! user's snapshot. Every other capability key is permitted outright.

use std::collections::HashSet;

use crate::authz::types::{EffectiveAuthz, WILDCARD_CAPABILITY};

/// Capabilities enforced when configuration does not override the list.
pub const DEFAULT_ACTIVE_CAPABILITIES: &[&str] = &[
    "students.profile.edit",
    "rooms.allocate",
    "visitors.approve",
    "complaints.resolve",
];

/// Set of capability keys currently under enforcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityAllowlist {
    keys: HashSet<String>,
}

impl CapabilityAllowlist {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keys: keys
                .into_iter()
                .map(|k| k.as_ref().trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for CapabilityAllowlist {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVE_CAPABILITIES)
    }
}

/// One lookup into the capability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityLookup<'a> {
    /// The capability's own entry.
    Specific(&'a str),
    /// The `"*"` entry.
    Wildcard,
}

impl<'a> CapabilityLookup<'a> {
    /// Probes in precedence order.
    pub fn chain(key: &'a str) -> [CapabilityLookup<'a>; 2] {
        [CapabilityLookup::Specific(key), CapabilityLookup::Wildcard]
    }

    fn table_key(&self) -> &'a str {
        match *self {
            CapabilityLookup::Specific(key) => key,
            CapabilityLookup::Wildcard => WILDCARD_CAPABILITY,
        }
    }

    /// Explicit value for this lookup, if any.
    pub fn explicit_value(&self, effective: &EffectiveAuthz) -> Option<bool> {
        effective.capabilities.get(self.table_key()).copied()
    }
}

/// First explicit value along the lookup chain.
pub fn explicit_capability(effective: &EffectiveAuthz, key: &str) -> Option<bool> {
    CapabilityLookup::chain(key)
        .iter()
        .find_map(|lookup| lookup.explicit_value(effective))
}
