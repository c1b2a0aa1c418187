use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::auth::scope::visible_projects;
use crate::auth::Identity;
use crate::error::ApiError;
use crate::AppState;

/// GET / - home payload: the caller plus the portfolio narrowed to what
/// they may see (admins: everything; clients: their own published work)
pub async fn home(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Value>, ApiError> {
    let projects = state.repo.list_projects().await?;
    let visible = visible_projects(Some(&identity), projects);

    let summaries: Vec<Value> = visible
        .iter()
        .map(|project| {
            json!({
                "id": project.id,
                "title": project.title,
                "client_name": project.client_name,
                "client_logo_url": project.client_logo_url,
                "category": project.category,
                "status": project.status,
                "cover_image": project.cover_image(),
            })
        })
        .collect();

    Ok(Json(json!({
        "success": true,
        "data": {
            "user": identity,
            "projects": summaries
        }
    })))
}
