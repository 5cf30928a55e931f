//! Cross-origin access.
//!
//! Any origin may call the API. Real preflights are answered by
//! `CorsLayer`; any other `OPTIONS` request gets an empty 200.

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderName, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{Any, CorsLayer};

const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, X_REQUESTED_WITH])
        .max_age(Duration::from_secs(60 * 60))
}

pub async fn answer_options(request: Request<Body>, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}
