//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the API base URL and endpoint paths
//! - Check the capability allowlist and log level
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AuthzConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::AuthzConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("api.base_url '{0}' is not a valid URL")]
    InvalidBaseUrl(String),

    #[error("api.base_url scheme '{0}' is not http or https")]
    UnsupportedScheme(String),

    #[error("api.{field} '{value}' must start with '/'")]
    RelativeEndpoint { field: &'static str, value: String },

    #[error("enforcement.active_capabilities[{0}] is empty")]
    BlankCapability(usize),

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AuthzConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.api.base_url) {
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
        }
        Ok(_) => {}
        Err(_) => errors.push(ValidationError::InvalidBaseUrl(config.api.base_url.clone())),
    }

    for (field, value) in [
        ("catalog_path", &config.api.catalog_path),
        ("authz_path", &config.api.authz_path),
    ] {
        if !value.starts_with('/') {
            errors.push(ValidationError::RelativeEndpoint {
                field,
                value: value.clone(),
            });
        }
    }

    for (i, key) in config.enforcement.active_capabilities.iter().enumerate() {
        if key.trim().is_empty() {
            errors.push(ValidationError::BlankCapability(i));
        }
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
