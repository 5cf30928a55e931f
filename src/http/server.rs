//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the item API (at `/` and under `/api`)
//! - Serve the static client from the configured directory
//! - Wire up middleware (tracing, request ID, CORS, limits, metrics)
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::InventoryConfig;
use crate::http::cors::{answer_options, cors_layer};
use crate::http::error::timeout_as_json;
use crate::http::handlers::{
    create_item, delete_item, get_item, health, list_items, method_not_allowed, patch_item,
    replace_item, route_not_found,
};
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::items::ItemRepository;
use crate::observability::metrics;
use crate::store::ItemStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: ItemRepository,
}

/// HTTP server for the inventory API.
pub struct HttpServer {
    router: Router,
    config: InventoryConfig,
}

impl HttpServer {
    /// Create a new HTTP server over the given store.
    pub fn new(config: InventoryConfig, store: Arc<dyn ItemStore>) -> Self {
        let state = AppState {
            repository: ItemRepository::new(store),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    fn api_routes() -> Router<AppState> {
        Router::new()
            .route(
                "/items",
                get(list_items).post(create_item).fallback(method_not_allowed),
            )
            .route(
                "/items/{id}",
                get(get_item)
                    .put(replace_item)
                    .patch(patch_item)
                    .delete(delete_item)
                    .fallback(method_not_allowed),
            )
            .route("/health", get(health).fallback(method_not_allowed))
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &InventoryConfig, state: AppState) -> Router {
        let app = Router::new()
            .merge(Self::api_routes())
            .nest("/api", Self::api_routes());

        let app = if config.static_files.enabled {
            let assets = ServeDir::new(&config.static_files.dir)
                .append_index_html_on_directories(true)
                .call_fallback_on_method_not_allowed(true)
                .not_found_service(route_not_found.into_service());
            app.fallback_service(assets)
        } else {
            app.fallback(route_not_found)
        };

        // Outermost first.
        let stack = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(propagate_request_id_layer())
            .layer(cors_layer());

        let request_secs = config.timeouts.request_secs;

        app.with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
            .layer(middleware::from_fn(answer_options))
            .layer(TimeoutLayer::new(Duration::from_secs(request_secs)))
            .layer(middleware::map_response_with_state(request_secs, timeout_as_json))
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(stack)
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            static_dir = %self.config.static_files.dir,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }
}
