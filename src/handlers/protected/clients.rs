use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use super::require_admin;
use crate::auth::Identity;
use crate::database::models::client::{ClientChanges, ClientInput};
use crate::error::ApiError;
use crate::services::client_service;
use crate::AppState;

/// GET /api/clients - all clients, alphabetical (admin)
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&identity)?;

    let clients = state.repo.list_clients().await?;
    Ok(Json(json!({ "success": true, "data": clients })))
}

/// GET /api/clients/:id (admin)
pub async fn show(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&identity)?;

    let client = state
        .repo
        .get_client(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("client {} not found", id)))?;

    Ok(Json(json!({ "success": true, "data": client })))
}

/// POST /api/clients (admin)
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(input): Json<ClientInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_admin(&identity)?;

    let created = client_service::create_client(state.repo.as_ref(), input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": created })),
    ))
}

/// PUT /api/clients/:id - update, writing through to denormalized project
/// fields (admin)
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(changes): Json<ClientChanges>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&identity)?;

    let updated =
        client_service::update_client(state.repo.as_ref(), state.storage.as_ref(), &id, changes)
            .await?;

    Ok(Json(json!({ "success": true, "data": updated })))
}

/// DELETE /api/clients/:id - blocked while projects or users still reference
/// the client (admin)
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&identity)?;

    client_service::delete_client(state.repo.as_ref(), state.storage.as_ref(), &id).await?;

    Ok(Json(json!({ "success": true, "data": { "deleted": id } })))
}
