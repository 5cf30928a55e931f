//! Mapping of crate errors onto HTTP responses.
//!
//! Every error body has the shape `{"error": <kind>, "message": <text>}`;
//! the browser client shows `message` in its notification.

use axum::{
    body::HttpBody,
    extract::{
        rejection::{JsonRejection, PathRejection},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            Error::Configuration(_) | Error::Connection(_) | Error::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "Request failed");
        } else {
            tracing::debug!(kind = self.kind(), error = %self, "Request rejected");
        }

        (status, Json(ErrorBody::new(self.kind(), self.to_string()))).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        // Oversized bodies surface here through `DefaultBodyLimit`.
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Error::PayloadTooLarge(rejection.body_text());
        }
        Error::Validation(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidIdentifier(rejection.body_text())
    }
}

/// Replace the empty 408 produced by the timeout layer with an error body.
pub async fn timeout_as_json(State(limit_secs): State<u64>, response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT && response.body().is_end_stream() {
        return Error::Timeout(limit_secs).into_response();
    }
    response
}
