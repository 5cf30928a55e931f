//! Inventory tracking API library.

pub mod config;
pub mod error;
pub mod http;
pub mod items;
pub mod lifecycle;
pub mod observability;
pub mod store;

pub use config::InventoryConfig;
pub use error::{Error, Result};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
