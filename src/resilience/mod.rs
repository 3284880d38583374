//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Session refresh:
//!     join(fetch catalog, fetch snapshot)
//!     → timeouts.rs (bounded wait)
//!     → Ok(both) | Err(timeout or fetch error)
//! ```
//!
//! # Design Decisions
//! - A stuck request never leaves the session in Loading
//! - Failures degrade to role defaults (handled by the lifecycle controller)

pub mod timeouts;

pub use timeouts::with_timeout;
