use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::require_admin;
use crate::auth::Identity;
use crate::error::ApiError;
use crate::storage::validate_image;
use crate::AppState;

const FOLDERS: &[&str] = &["projects", "logos", "avatars"];

/// Headroom for multipart boundaries and part headers on top of the policy
/// maximum.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Body cap for the uploads route. The framework default (2 MB) is below the
/// policy maximum, so without this an oversized body dies as a malformed
/// request while reading, and `validate_image` never gets to rule on it.
pub fn body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(crate::config::config().uploads.max_size_bytes + MULTIPART_OVERHEAD)
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub folder: Option<String>,
}

/// POST /api/uploads - multipart image upload (admin)
///
/// The size/type policy runs before any storage write, so a rejected file
/// leaves both storage and every record untouched. The returned public URL
/// is what project/client writes reference afterwards.
pub async fn upload(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    require_admin(&identity)?;

    let folder = query.folder.as_deref().unwrap_or("projects");
    if !FOLDERS.contains(&folder) {
        return Err(ApiError::bad_request(format!(
            "Unknown upload folder '{}'",
            folder
        )));
    }

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field
            .content_type()
            .ok_or_else(|| ApiError::bad_request("Upload is missing a content type"))?
            .to_string();

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;

        validate_image(&content_type, bytes.len())?;

        let url = state
            .storage
            .upload(bytes.to_vec(), &content_type, folder)
            .await?;

        return Ok(Json(json!({ "success": true, "data": { "url": url } })));
    }

    Err(ApiError::bad_request("Multipart field 'file' is required"))
}
