//! Session lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! sign_in(user):
//!     publish Loading snapshot (inline record or role default)
//!     → join(fetch catalog, fetch snapshot) under timeout
//!     → compile catalog index
//!     → publish Ready snapshot (fetched data, or role default + error)
//!
//! refresh():
//!     same as above without leaving the signed-in state
//!
//! sign_out():
//!     publish Unauthenticated snapshot (role-less default)
//! ```
//!
//! # Design Decisions
//! - One explicit session object per application session, no globals
//! - Source injected at construction so tests can isolate instances
//! - Never stuck in Loading: timeouts and failures still reach Ready

pub mod controller;
pub mod state;

pub use controller::{AuthzSession, SessionSettings};
pub use state::{AuthzSnapshot, Diagnostics, LifecycleState};
