use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::require_admin;
use crate::auth::scope::{can_view, visible_projects};
use crate::auth::Identity;
use crate::database::models::project::{Project, ProjectInput};
use crate::error::ApiError;
use crate::services::project_service;
use crate::AppState;

/// Wire shape for a project: the stored record plus the derived cover image.
fn project_json(project: &Project) -> Value {
    let cover = project.cover_image().to_string();
    let mut value = serde_json::to_value(project).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.insert("cover_image".to_string(), json!(cover));
    }
    value
}

/// GET /api/projects - list projects visible to the caller
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Value>, ApiError> {
    let projects = state.repo.list_projects().await?;
    let visible = visible_projects(Some(&identity), projects);

    Ok(Json(json!({
        "success": true,
        "data": visible.iter().map(project_json).collect::<Vec<_>>()
    })))
}

/// GET /api/projects/:id - single project, 404 when absent or out of scope
pub async fn show(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let project = state
        .repo
        .get_project(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("project {} not found", id)))?;

    // Out-of-scope projects look exactly like missing ones.
    if !can_view(Some(&identity), &project) {
        return Err(ApiError::not_found(format!("project {} not found", id)));
    }

    Ok(Json(json!({
        "success": true,
        "data": project_json(&project)
    })))
}

/// POST /api/projects - create (admin)
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(input): Json<ProjectInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_admin(&identity)?;

    let created = project_service::create_project(state.repo.as_ref(), input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": project_json(&created)
        })),
    ))
}

/// PUT /api/projects/:id - full replace (admin); stale images are released
/// after the write
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProjectInput>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&identity)?;

    let updated =
        project_service::update_project(state.repo.as_ref(), state.storage.as_ref(), id, input)
            .await?;

    Ok(Json(json!({
        "success": true,
        "data": project_json(&updated)
    })))
}

/// DELETE /api/projects/:id - delete record, then release its images (admin)
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&identity)?;

    project_service::delete_project(state.repo.as_ref(), state.storage.as_ref(), id).await?;

    Ok(Json(json!({ "success": true, "data": { "deleted": id } })))
}
