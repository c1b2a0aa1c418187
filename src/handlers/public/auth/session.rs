use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Form, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use serde_json::json;

use crate::auth::session::{encode_session, session_cookie, SessionClaims};
use crate::auth::{Identity, SESSION_COOKIE_NAME};
use crate::error::ApiError;
use crate::middleware::session::resolve_identity;
use crate::services::auth_service;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /login - authenticate and establish a session
///
/// Verifies the submitted email/password against the users table, sets the
/// session cookie and redirects home. Failures return 401 with one generic
/// message for both unknown email and wrong password, and set no cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(payload): Form<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user =
        auth_service::verify_login(state.repo.as_ref(), &payload.email, &payload.password).await?;

    let identity = Identity::from(user);
    let token = encode_session(&SessionClaims::new(&identity)).map_err(|e| {
        tracing::error!("Session token generation failed: {}", e);
        ApiError::internal_server_error("Failed to establish session")
    })?;

    let jar = jar.add(session_cookie(token));
    Ok((jar, Redirect::to("/")))
}

/// GET /login - already-authenticated callers are sent home
pub async fn login_page(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let token = jar
        .get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string());

    let (clear_cookie, identity) = resolve_identity(state.repo.as_ref(), token.as_deref()).await;
    if identity.is_some() {
        return Redirect::to("/").into_response();
    }

    let jar = if clear_cookie {
        jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"))
    } else {
        jar
    };

    (
        jar,
        Json(json!({
            "success": true,
            "data": {
                "message": "POST email and password form fields to /login"
            }
        })),
    )
        .into_response()
}

/// POST /logout - clear the session cookie and return to the login route
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"));
    tracing::info!("User logged out");
    (jar, Redirect::to("/login"))
}
