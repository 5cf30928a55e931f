//! Metrics collection and exposition.
//!
//! # Metrics
//! - `inventory_requests_total` (counter): requests by method, route, status
//! - `inventory_request_duration_seconds` (histogram): latency distribution
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus
//! recorder.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "inventory_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    ::metrics::histogram!(
        "inventory_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Middleware recording one sample per request, labelled by matched route.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
