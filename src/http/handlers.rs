//! Route handlers for the item API.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::http::error::ErrorBody;
use crate::http::server::AppState;
use crate::items::{Deleted, Item, ItemChanges, ItemId, NewItem};

/// `{id}` segment; undecodable values are reported as bad identifiers.
type IdPath = std::result::Result<Path<String>, PathRejection>;

pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>> {
    Ok(Json(state.repository.list_all().await?))
}

pub async fn get_item(State(state): State<AppState>, id: IdPath) -> Result<Json<Item>> {
    let Path(id) = id?;
    Ok(Json(state.repository.get_by_id(&id).await?))
}

pub async fn create_item(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewItem>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>)> {
    let Json(new_item) = payload?;
    let item = state.repository.create(new_item).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn replace_item(
    State(state): State<AppState>,
    id: IdPath,
    payload: std::result::Result<Json<ItemChanges>, JsonRejection>,
) -> Result<Json<Item>> {
    // The identifier is checked before the body.
    let Path(id) = id?;
    let _: ItemId = id.parse()?;
    let Json(changes) = payload?;
    Ok(Json(state.repository.replace(&id, changes).await?))
}

pub async fn patch_item(
    State(state): State<AppState>,
    id: IdPath,
    payload: std::result::Result<Json<ItemChanges>, JsonRejection>,
) -> Result<Json<Item>> {
    let Path(id) = id?;
    let _: ItemId = id.parse()?;
    let Json(changes) = payload?;
    Ok(Json(state.repository.patch(&id, changes).await?))
}

pub async fn delete_item(State(state): State<AppState>, id: IdPath) -> Result<Json<Deleted>> {
    let Path(id) = id?;
    Ok(Json(state.repository.delete(&id).await?))
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub store: &'static str,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        version: env!("CARGO_PKG_VERSION"),
        store: state.repository.backend(),
    })
}

/// Fallback for paths no route or static file matches.
pub async fn route_not_found(method: Method, uri: axum::http::Uri) -> Response {
    tracing::debug!(method = %method, path = %uri.path(), "No route matched");
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new(
            "route_not_found",
            format!("no route for {} {}", method, uri.path()),
        )),
    )
        .into_response()
}

/// Fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed(method: Method, uri: axum::http::Uri) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody::new(
            "method_not_allowed",
            format!("{} is not allowed on {}", method, uri.path()),
        )),
    )
        .into_response()
}
