//! Authorization API client.
//!
//! # Responsibilities
//! - Define the source contract consumed by the session lifecycle
//! - Fetch the route catalog and per-user snapshot over HTTP
//!
//! # Design Decisions
//! - Sources are injected (trait), never global
//! - Route entries stay raw JSON until catalog validation
//! - No retries here: the session falls back to role defaults instead

pub mod http;
pub mod source;

pub use http::HttpAuthzSource;
pub use source::{AuthzPayload, AuthzSource, CatalogPayload, FetchError};
