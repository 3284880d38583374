//! Route catalog subsystem.
//!
//! # Data Flow
//! ```text
//! Catalog compilation (on every catalog fetch):
//!     raw JSON routes
//!     → catalog.rs (validate entries, collect rejections)
//!     → matcher.rs (compile templates)
//!     → index.rs (exact table + ordered pattern list)
//!     → Freeze as immutable CatalogIndex
//!
//! Path resolution:
//!     request path
//!     → normalize.rs (strip query/fragment/trailing slash)
//!     → index.rs (exact lookup, then first matching pattern)
//!     → Return: route key or None
//! ```
//!
//! # Design Decisions
//! - Index compiled once per catalog, immutable afterwards
//! - No regex (segment comparison only)
//! - Deterministic: same catalog and path always resolve to the same key

pub mod catalog;
pub mod index;
pub mod matcher;
pub mod normalize;

pub use catalog::{Catalog, RejectReason, Rejection, RouteDefinition};
pub use index::CatalogIndex;
pub use normalize::normalize_path;
