//! Authorization decision subsystem.
//!
//! # Data Flow
//! ```text
//! EffectiveAuthz (server snapshot or role default)
//!     + CatalogIndex (compiled route catalog)
//!     + CapabilityAllowlist (staged enforcement)
//!     → engine.rs (pure decision functions)
//!     → bool / constraint value
//! ```
//!
//! # Design Decisions
//! - Fail-open: missing data allows, only explicit `false` denies
//! - Decision functions never error; bad input takes the safe branch
//! - Capability lookup order is explicit (specific, then wildcard)

pub mod capabilities;
pub mod engine;
pub mod types;

pub use capabilities::{CapabilityAllowlist, DEFAULT_ACTIVE_CAPABILITIES};
pub use engine::Decisions;
pub use types::{EffectiveAuthz, InlineAuthz, Override, SessionUser};
