//! Lifecycle management.
//!
//! ```text
//! SIGTERM/SIGINT (signals.rs)
//!     → Shutdown::trigger (shutdown.rs)
//!     → HTTP server stops accepting, drains in-flight requests
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
