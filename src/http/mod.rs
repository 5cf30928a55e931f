//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, middleware stack)
//!     → request.rs (request ID, request span)
//!     → cors.rs (CORS headers, OPTIONS answers)
//!     → handlers.rs (item routes, health, fallbacks)
//!     → ItemRepository
//!     → error.rs (Error → status + JSON body)
//! ```

pub mod cors;
pub mod error;
pub mod handlers;
pub mod request;
pub mod server;

pub use error::ErrorBody;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
