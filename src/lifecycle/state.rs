//! Session state machine and published snapshots.
//!
//! # States
//! - Unauthenticated: no user, role-less default record
//! - Loading: user present, catalog + snapshot fetch in flight
//! - Ready: fetch joined (either applied or fell back to the role default)
//!
//! # State Transitions
//! ```text
//! Unauthenticated → Loading: sign-in
//! Loading → Ready:           both fetches succeed, or either fails / times out
//! Ready → Loading:           refresh
//! any → Unauthenticated:     sign-out
//! ```
//!
//! # Design Decisions
//! - Every transition publishes a whole new snapshot (never mutated in place)
//! - The epoch changes on sign-in/sign-out so late fetch results are discarded

use std::sync::Arc;

use serde::Serialize;

use crate::authz::capabilities::CapabilityAllowlist;
use crate::authz::engine::Decisions;
use crate::authz::types::{EffectiveAuthz, Override, SessionUser};
use crate::routing::catalog::{Catalog, Rejection};
use crate::routing::index::CatalogIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Unauthenticated,
    Loading,
    Ready,
}

/// Everything consumers may observe at one instant.
#[derive(Debug, Clone)]
pub struct AuthzSnapshot {
    pub state: LifecycleState,
    pub(crate) epoch: u64,
    pub user: Option<SessionUser>,
    pub catalog: Option<Arc<Catalog>>,
    pub index: Arc<CatalogIndex>,
    pub rejections: Arc<Vec<Rejection>>,
    pub effective: EffectiveAuthz,
    pub override_: Option<Override>,
    pub error: Option<String>,
}

impl AuthzSnapshot {
    /// Snapshot with no user and no catalog.
    pub fn signed_out(epoch: u64) -> Self {
        Self {
            state: LifecycleState::Unauthenticated,
            epoch,
            user: None,
            catalog: None,
            index: Arc::new(CatalogIndex::default()),
            rejections: Arc::new(Vec::new()),
            effective: EffectiveAuthz::role_default(None),
            override_: None,
            error: None,
        }
    }

    /// Snapshot published the moment a user signs in.
    pub fn signed_in(epoch: u64, user: SessionUser) -> Self {
        Self {
            state: LifecycleState::Loading,
            effective: user.initial_effective(),
            user: Some(user),
            ..Self::signed_out(epoch)
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn loading(&self) -> bool {
        self.state == LifecycleState::Loading
    }

    pub fn decisions<'a>(&'a self, allowlist: &'a CapabilityAllowlist) -> Decisions<'a> {
        Decisions::new(&self.index, Some(&self.effective), allowlist)
    }

    /// Read-only view for debug panels and the CLI.
    pub fn diagnostics(&self) -> Diagnostics<'_> {
        Diagnostics {
            state: self.state,
            loading: self.loading(),
            error: self.error.as_deref(),
            role: self.effective.role.as_deref(),
            effective: &self.effective,
            override_: self.override_.as_ref(),
            catalog_routes: self.catalog.as_ref().map(|c| c.routes.len()).unwrap_or(0),
            rejections: self.rejections.as_slice(),
        }
    }
}

/// Serializable diagnostic view of a snapshot.
#[derive(Debug, Serialize)]
pub struct Diagnostics<'a> {
    pub state: LifecycleState,
    pub loading: bool,
    pub error: Option<&'a str>,
    pub role: Option<&'a str>,
    pub effective: &'a EffectiveAuthz,
    #[serde(rename = "override")]
    pub override_: Option<&'a Override>,
    pub catalog_routes: usize,
    pub rejections: &'a [Rejection],
}
