//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Every failure is
//! collected so a bad config file is reported in one pass.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::InventoryConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub(crate) fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &InventoryConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.database.collection.trim().is_empty() {
        errors.push(ValidationError::new("database.collection", "must not be empty"));
    }
    if let Some(name) = &config.database.name {
        if name.trim().is_empty() {
            errors.push(ValidationError::new("database.name", "must not be empty when set"));
        }
    }
    if config.database.max_pool_size == 0 {
        errors.push(ValidationError::new("database.max_pool_size", "must be greater than 0"));
    }
    if config.database.server_selection_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "database.server_selection_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.database.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "database.connect_timeout_secs",
            "must be greater than 0",
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::new("limits.max_body_bytes", "must be greater than 0"));
    }

    if config.static_files.enabled && config.static_files.dir.trim().is_empty() {
        errors.push(ValidationError::new("static_files.dir", "must not be empty"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
