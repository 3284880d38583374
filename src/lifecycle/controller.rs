//! Session lifecycle controller.
//!
//! # Responsibilities
//! - Track sign-in / sign-out of the current user
//! - Fetch catalog and snapshot concurrently, bounded by a timeout
//! - Publish complete snapshots for the decision functions
//! - Fall back to the role default when fetching fails
//!
//! # Design Decisions
//! - Snapshots live in an ArcSwap: readers never lock and never see a torn record
//! - Refreshes are serialized by a gate; callers queued behind a refresh that
//!   applied for the current epoch return without fetching again
//! - Results started under an older epoch are dropped

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::authz::capabilities::CapabilityAllowlist;
use crate::authz::types::{EffectiveAuthz, Override, SessionUser};
use crate::client::source::{AuthzSource, FetchError};
use crate::config::AuthzConfig;
use crate::lifecycle::state::{AuthzSnapshot, LifecycleState};
use crate::observability::metrics;
use crate::resilience::timeouts::with_timeout;
use crate::routing::catalog::Catalog;
use crate::routing::index::CatalogIndex;

/// Tunables for a session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Bound on the joined fetch. `None` waits indefinitely.
    pub fetch_timeout: Option<Duration>,
    pub allowlist: CapabilityAllowlist,
}

impl SessionSettings {
    pub fn from_config(config: &AuthzConfig) -> Self {
        Self {
            fetch_timeout: config.timeouts.fetch_timeout(),
            allowlist: config.enforcement.allowlist(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&AuthzConfig::default())
    }
}

/// Authorization state for one application session.
pub struct AuthzSession<S> {
    source: S,
    settings: SessionSettings,
    inner: ArcSwap<AuthzSnapshot>,
    epoch: AtomicU64,
    /// Holds the epoch of the last applied refresh.
    refresh_gate: Mutex<Option<u64>>,
    applied_refreshes: AtomicU64,
}

impl<S: AuthzSource> AuthzSession<S> {
    /// Create an unauthenticated session.
    pub fn new(source: S, settings: SessionSettings) -> Self {
        Self {
            source,
            settings,
            inner: ArcSwap::from_pointee(AuthzSnapshot::signed_out(0)),
            epoch: AtomicU64::new(0),
            refresh_gate: Mutex::new(None),
            applied_refreshes: AtomicU64::new(0),
        }
    }

    /// Switch to `user` and load their authorization data.
    ///
    /// The user's inline record (or role default) is published immediately;
    /// the fetched snapshot replaces it once both fetches complete.
    pub async fn sign_in(&self, user: SessionUser) {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(
            epoch,
            user_id = user.id.as_deref().unwrap_or("-"),
            role = user.role.as_deref().unwrap_or("-"),
            "User signed in"
        );
        self.inner
            .store(Arc::new(AuthzSnapshot::signed_in(epoch, user)));
        self.refresh().await;
    }

    /// Drop all user data and return to the role-less default.
    pub fn sign_out(&self) {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.store(Arc::new(AuthzSnapshot::signed_out(epoch)));
        tracing::info!(epoch, "User signed out");
    }

    /// Re-fetch catalog and snapshot for the signed-in user.
    ///
    /// Never fails: errors end up in the snapshot's `error` field.
    pub async fn refresh(&self) {
        let observed = self.applied_refreshes.load(Ordering::SeqCst);
        let mut last_applied = self.refresh_gate.lock().await;

        let current = self.inner.load_full();
        let epoch = current.epoch;
        // A refresh applied by another caller only counts if it was for the
        // session that is current now.
        if self.applied_refreshes.load(Ordering::SeqCst) != observed && *last_applied == Some(epoch) {
            tracing::debug!(epoch, "Refresh coalesced with one that just completed");
            return;
        }

        let Some(user) = current.user.clone() else {
            tracing::debug!("No signed-in user, skipping refresh");
            return;
        };
        let refresh_id = Uuid::new_v4();
        let start = Instant::now();

        self.publish_if_current(epoch, |s| AuthzSnapshot {
            state: LifecycleState::Loading,
            ..s.clone()
        });
        tracing::debug!(refresh_id = %refresh_id, epoch, "Fetching catalog and snapshot");

        let fetched = with_timeout(self.settings.fetch_timeout, async {
            tokio::try_join!(self.source.fetch_catalog(), self.source.fetch_authz(&user))
        })
        .await;

        let outcome = match fetched {
            Ok((catalog_payload, authz_payload)) => {
                let (catalog, mut rejections) = Catalog::from_raw(&catalog_payload.catalog.routes);
                let (index, template_rejections) = CatalogIndex::build(&catalog);
                rejections.extend(template_rejections);

                for r in &rejections {
                    tracing::warn!(
                        refresh_id = %refresh_id,
                        route_index = r.route_index,
                        key = ?r.key,
                        template = ?r.template,
                        reason = %r.reason,
                        "Skipped catalog entry"
                    );
                }
                let routes = catalog.routes.len();
                let catalog = Arc::new(catalog);
                let index = Arc::new(index);
                let rejections = Arc::new(rejections);
                let effective = authz_payload.authz.effective;
                let override_ = authz_payload.authz.override_;

                let applied = self.publish_if_current(epoch, |s| AuthzSnapshot {
                    state: LifecycleState::Ready,
                    epoch,
                    user: s.user.clone(),
                    catalog: Some(Arc::clone(&catalog)),
                    index: Arc::clone(&index),
                    rejections: Arc::clone(&rejections),
                    effective: effective.clone(),
                    override_: override_.clone(),
                    error: None,
                });
                if applied {
                    metrics::record_catalog(index.exact_len(), index.matchers().len(), rejections.len());
                    tracing::info!(
                        refresh_id = %refresh_id,
                        routes,
                        role = effective.role.as_deref().unwrap_or("-"),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Authorization snapshot applied"
                    );
                    "ok"
                } else {
                    "stale"
                }
            }
            Err(e) => {
                let outcome = match e {
                    FetchError::Timeout(_) => "timeout",
                    _ => "failed",
                };
                let message = e.to_string();
                let fallback = user.role_default();

                let applied = self.publish_if_current(epoch, |s| AuthzSnapshot {
                    state: LifecycleState::Ready,
                    effective: fallback.clone(),
                    override_: None,
                    error: Some(message.clone()),
                    ..s.clone()
                });
                if applied {
                    tracing::warn!(
                        refresh_id = %refresh_id,
                        error = %message,
                        role = fallback.role.as_deref().unwrap_or("-"),
                        "Authorization fetch failed, using role default"
                    );
                    outcome
                } else {
                    "stale"
                }
            }
        };

        if outcome == "stale" {
            tracing::debug!(refresh_id = %refresh_id, epoch, "Session changed during fetch, result discarded");
        } else {
            *last_applied = Some(epoch);
            self.applied_refreshes.fetch_add(1, Ordering::SeqCst);
        }
        metrics::record_refresh(outcome, start);
    }

    /// Publish `f(current)` only if the session is still on `epoch`.
    fn publish_if_current<F>(&self, epoch: u64, f: F) -> bool
    where
        F: Fn(&AuthzSnapshot) -> AuthzSnapshot,
    {
        let mut applied = false;
        self.inner.rcu(|current| {
            if current.epoch == epoch {
                applied = true;
                Arc::new(f(current))
            } else {
                applied = false;
                Arc::clone(current)
            }
        });
        applied
    }

    /// Current snapshot. Holding it keeps a consistent view across calls.
    pub fn snapshot(&self) -> Arc<AuthzSnapshot> {
        self.inner.load_full()
    }

    pub fn allowlist(&self) -> &CapabilityAllowlist {
        &self.settings.allowlist
    }

    pub fn can_route(&self, route_key: &str) -> bool {
        self.inner
            .load()
            .decisions(&self.settings.allowlist)
            .can_route(route_key)
    }

    pub fn resolve_route_key_by_path(&self, path: &str) -> Option<String> {
        self.inner.load().index.resolve(path).map(str::to_string)
    }

    pub fn can_route_by_path(&self, path: &str) -> bool {
        self.inner
            .load()
            .decisions(&self.settings.allowlist)
            .can_route_by_path(path)
    }

    pub fn can(&self, capability: &str) -> bool {
        self.inner
            .load()
            .decisions(&self.settings.allowlist)
            .can(capability)
    }

    pub fn can_any<K: AsRef<str>>(&self, keys: &[K]) -> bool {
        self.inner
            .load()
            .decisions(&self.settings.allowlist)
            .can_any(keys)
    }

    pub fn can_all<K: AsRef<str>>(&self, keys: &[K]) -> bool {
        self.inner
            .load()
            .decisions(&self.settings.allowlist)
            .can_all(keys)
    }

    pub fn get_constraint(&self, key: &str, fallback: Value) -> Value {
        self.inner
            .load()
            .decisions(&self.settings.allowlist)
            .constraint(key, fallback)
    }

    pub fn state(&self) -> LifecycleState {
        self.inner.load().state
    }

    pub fn loading(&self) -> bool {
        self.inner.load().loading()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.load().error.clone()
    }

    pub fn catalog(&self) -> Option<Arc<Catalog>> {
        self.inner.load().catalog.clone()
    }

    pub fn override_(&self) -> Option<Override> {
        self.inner.load().override_.clone()
    }

    pub fn effective(&self) -> EffectiveAuthz {
        self.inner.load().effective.clone()
    }
}
