use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::require_admin;
use crate::auth::password::hash_password;
use crate::auth::Identity;
use crate::database::models::user::{UserInput, UserUpdate};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub status: String,
    pub client_id: Option<String>,
}

/// Full-replace update; `password` may be omitted to keep the current one,
/// and omitting `client_id` clears the tenant reference.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub role: String,
    pub status: String,
    pub client_id: Option<String>,
}

fn hashed(password: &str) -> Result<String, ApiError> {
    hash_password(password).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal_server_error("Failed to process password")
    })
}

/// GET /api/users (admin). Password hashes never serialize.
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&identity)?;

    let users = state.repo.list_users().await?;
    Ok(Json(json!({ "success": true, "data": users })))
}

/// GET /api/users/:id (admin)
pub async fn show(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&identity)?;

    let user = state
        .repo
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("user {} not found", id)))?;

    Ok(Json(json!({ "success": true, "data": user })))
}

/// POST /api/users (admin)
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_admin(&identity)?;

    let input = UserInput {
        name: payload.name,
        email: payload.email,
        password_hash: hashed(&payload.password)?,
        role: payload.role,
        status: payload.status,
        client_id: payload.client_id,
    };

    let created = state.repo.create_user(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": created })),
    ))
}

/// PUT /api/users/:id (admin)
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&identity)?;

    let password_hash = match &payload.password {
        Some(password) => Some(hashed(password)?),
        None => None,
    };

    let update = UserUpdate {
        name: Some(payload.name),
        email: Some(payload.email),
        password_hash,
        role: Some(payload.role),
        status: Some(payload.status),
        client_id: Some(payload.client_id),
    };

    let updated = state.repo.update_user(id, update).await?;
    Ok(Json(json!({ "success": true, "data": updated })))
}

/// DELETE /api/users/:id (admin)
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&identity)?;

    if id == identity.id {
        return Err(ApiError::bad_request("You cannot delete your own account"));
    }

    state.repo.delete_user(id).await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": id } })))
}
