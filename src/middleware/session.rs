use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::{debug, error, warn};

use crate::auth::session::decode_session;
use crate::auth::{Identity, SESSION_COOKIE_NAME};
use crate::database::repository::PortfolioRepository;
use crate::AppState;

/// Resolve a session token to a fresh identity.
///
/// The token is treated purely as a lookup key: after a successful decode the
/// user is re-fetched by (id, role) and must still be active. Role or status
/// changes made by an admin therefore take effect on the very next request,
/// without waiting for the old session to expire.
///
/// Returns `(clear_cookie, identity)`; `clear_cookie` is set whenever the
/// presented token is malformed, expired, or no longer backed by a matching
/// active record.
pub async fn resolve_identity(
    repo: &dyn PortfolioRepository,
    token: Option<&str>,
) -> (bool, Option<Identity>) {
    let token = match token {
        Some(token) => token,
        None => return (false, None),
    };

    let claims = match decode_session(token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("Discarding session cookie: {}", e);
            return (true, None);
        }
    };

    let user = match repo.get_user_by_id_role(claims.sub, &claims.role).await {
        Ok(user) => user,
        Err(e) => {
            // Repository trouble is not the browser's fault; keep the cookie
            // so the session survives a transient outage.
            error!("Session re-validation failed: {}", e);
            return (false, None);
        }
    };

    match user {
        Some(user) if user.is_active() => (false, Some(Identity::from(user))),
        Some(user) => {
            warn!("Session for {} discarded: account inactive", user.email);
            (true, None)
        }
        None => {
            warn!(
                "Session discarded: no active user with id {} and role '{}'",
                claims.sub, claims.role
            );
            (true, None)
        }
    }
}

/// Route-protection middleware for everything behind the login wall.
///
/// A request without a resolvable session is redirected to `/login` (with
/// any invalid cookie cleared); otherwise the fresh identity is injected as
/// a request extension for handlers to consume.
pub async fn session_guard(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let token = jar
        .get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string());

    let (clear_cookie, identity) = resolve_identity(state.repo.as_ref(), token.as_deref()).await;

    let jar = if clear_cookie {
        jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"))
    } else {
        jar
    };

    match identity {
        Some(identity) => {
            request.extensions_mut().insert(identity);
            (jar, next.run(request).await).into_response()
        }
        None => (jar, Redirect::to("/login")).into_response(),
    }
}
