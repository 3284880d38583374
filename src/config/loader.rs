//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::AuthzConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides `api.bearer_token`.
pub const TOKEN_ENV: &str = "AUTHZ_API_TOKEN";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AuthzConfig, ConfigError> {
    let config: AuthzConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AuthzConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Load from `path` when given, otherwise use defaults; then apply
/// environment overrides.
pub fn load_or_default(path: Option<&Path>) -> Result<AuthzConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => AuthzConfig::default(),
    };
    apply_env_overrides(&mut config, std::env::var(TOKEN_ENV).ok());
    Ok(config)
}

fn apply_env_overrides(config: &mut AuthzConfig, token: Option<String>) {
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        config.api.bearer_token = Some(token);
    }
}
