//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → AuthzConfig (validated, immutable)
//!     → handed to the HTTP source and the session
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::ApiConfig;
pub use schema::AuthzConfig;
pub use schema::EnforcementConfig;
pub use schema::ObservabilityConfig;
pub use schema::TimeoutConfig;
