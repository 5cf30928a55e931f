//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::InventoryConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable carrying the store connection string.
pub const MONGODB_URI_ENV: &str = "MONGODB_URI";

/// Environment variable overriding the listener port.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<InventoryConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build the runtime configuration: file (or defaults), then process
/// environment overrides, then validation.
///
/// A malformed override is reported alongside any file validation errors.
pub fn load(path: Option<&Path>) -> Result<InventoryConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => InventoryConfig::default(),
    };

    let mut errors = Vec::new();
    if let Err(e) = apply_env_overrides(&mut config, |key| std::env::var(key).ok()) {
        errors.push(e);
    }
    if let Err(invalid) = validate_config(&config) {
        errors.extend(invalid);
    }

    if errors.is_empty() {
        Ok(config)
    } else {
        Err(ConfigError::Validation(errors))
    }
}

fn read_config(path: &Path) -> Result<InventoryConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply `MONGODB_URI` and `PORT` on top of a loaded configuration.
///
/// A blank `MONGODB_URI` is ignored. A `PORT` that is not a port number
/// leaves the bind address untouched and is returned as an error.
pub fn apply_env_overrides<F>(
    config: &mut InventoryConfig,
    lookup: F,
) -> Result<(), ValidationError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(uri) = lookup(MONGODB_URI_ENV).filter(|v| !v.trim().is_empty()) {
        config.database.uri = Some(uri);
    }

    if let Some(port) = lookup(PORT_ENV) {
        let port: u16 = port.trim().parse().map_err(|e| {
            ValidationError::new(PORT_ENV, format!("'{}' is not a port number: {}", port, e))
        })?;
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{}:{}", host, port);
    }

    Ok(())
}
