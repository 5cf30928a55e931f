//! Crate-wide error taxonomy.
//!
//! Every repository and connector failure is one of these variants; the HTTP
//! layer maps each to a status code in `http::error`.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or unusable configuration, e.g. no connection string.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The store could not be reached or refused the credentials.
    #[error("connection error: {0}")]
    Connection(String),

    /// A request body failed field validation.
    #[error("{0}")]
    Validation(String),

    /// A path identifier is not a well-formed store identifier.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("item {0} not found")]
    NotFound(String),

    /// A request body exceeded the configured size limit.
    #[error("request body too large: {0}")]
    PayloadTooLarge(String),

    /// The request did not complete within the configured time limit.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// Any other store-level failure.
    #[error("store error: {0}")]
    Store(String),
}

impl Error {
    /// Short machine-readable kind used in error bodies and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "configuration_error",
            Error::Connection(_) => "connection_error",
            Error::Validation(_) => "validation_error",
            Error::InvalidIdentifier(_) => "invalid_identifier",
            Error::NotFound(_) => "not_found",
            Error::PayloadTooLarge(_) => "payload_too_large",
            Error::Timeout(_) => "request_timeout",
            Error::Store(_) => "store_error",
        }
    }
}

impl From<mongodb::error::Error> for Error {
    fn from(e: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match *e.kind {
            ErrorKind::Authentication { .. }
            | ErrorKind::ServerSelection { .. }
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. } => Error::Connection(e.to_string()),
            _ => Error::Store(e.to_string()),
        }
    }
}
