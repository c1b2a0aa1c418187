use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::Identity;
use crate::database::models::user::UserUpdate;
use crate::error::ApiError;
use crate::services::auth_service::{self, AuthError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
}

/// GET /api/profile - the caller's own record
pub async fn show(Extension(identity): Extension<Identity>) -> Json<Value> {
    Json(json!({ "success": true, "data": identity }))
}

/// PUT /api/profile - self-service edit of one's own name and email
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<ProfileUpdateRequest>,
) -> Result<Json<Value>, ApiError> {
    let update = UserUpdate {
        name: Some(payload.name),
        email: Some(payload.email),
        ..Default::default()
    };

    let updated = state.repo.update_user(identity.id, update).await?;
    Ok(Json(json!({ "success": true, "data": updated })))
}

/// PUT /api/profile/password - change own password, re-verifying the
/// current one first
pub async fn change_password(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<PasswordChangeRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.new_password.len() < 8 {
        return Err(ApiError::bad_request(
            "New password must be at least 8 characters",
        ));
    }

    auth_service::change_password(
        state.repo.as_ref(),
        identity.id,
        &identity.role,
        &payload.current_password,
        &payload.new_password,
    )
    .await
    .map_err(|e| match e {
        AuthError::InvalidCredentials => ApiError::bad_request("Current password is incorrect"),
        AuthError::Repository(e) => e.into(),
    })?;

    Ok(Json(json!({ "success": true, "data": { "changed": true } })))
}
