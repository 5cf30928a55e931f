//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (MONGODB_URI, PORT)
//!     → validation.rs (semantic checks)
//!     → InventoryConfig (validated, immutable)
//!     → handed to the connector and the HTTP server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Store credentials come from the environment, never from source

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, load_config, ConfigError};
pub use schema::{
    DatabaseConfig, InventoryConfig, LimitsConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, StaticFilesConfig, TimeoutConfig,
};
