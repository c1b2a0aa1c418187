use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::auth::Identity;

/// GET /api/auth/whoami - the caller's freshly resolved identity
pub async fn whoami(Extension(identity): Extension<Identity>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": identity
    }))
}
