//! Client-side authorization for the hostel management front end.
//!
//! Turns the server's route catalog and the signed-in user's effective
//! authorization into route, capability and constraint decisions.

pub mod authz;
pub mod client;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;

pub use authz::{CapabilityAllowlist, Decisions, EffectiveAuthz, SessionUser};
pub use client::{AuthzSource, FetchError, HttpAuthzSource};
pub use config::AuthzConfig;
pub use lifecycle::{AuthzSession, LifecycleState, SessionSettings};
pub use routing::{Catalog, CatalogIndex};
