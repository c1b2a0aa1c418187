pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod storage;
pub mod testing;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database::repository::PortfolioRepository;
use crate::storage::ObjectStorage;

/// Shared handles injected into every handler. The repository and storage
/// boundaries are trait objects so tests can swap in the fakes from
/// [`crate::testing`].
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn PortfolioRepository>,
    pub storage: Arc<dyn ObjectStorage>,
}

/// Build the full router. Everything except `/login`, `/logout` and
/// `/health` sits behind the session guard, which redirects cookie-less
/// callers to `/login` and injects a fresh [`auth::Identity`] otherwise.
pub fn app(state: AppState) -> Router {
    use handlers::{protected, public};

    let guarded = Router::new()
        .route("/", get(protected::home::home))
        .route("/api/auth/whoami", get(protected::auth::whoami))
        .route(
            "/api/projects",
            get(protected::projects::list).post(protected::projects::create),
        )
        .route(
            "/api/projects/:id",
            get(protected::projects::show)
                .put(protected::projects::update)
                .delete(protected::projects::delete),
        )
        .route(
            "/api/clients",
            get(protected::clients::list).post(protected::clients::create),
        )
        .route(
            "/api/clients/:id",
            get(protected::clients::show)
                .put(protected::clients::update)
                .delete(protected::clients::delete),
        )
        .route(
            "/api/users",
            get(protected::users::list).post(protected::users::create),
        )
        .route(
            "/api/users/:id",
            get(protected::users::show)
                .put(protected::users::update)
                .delete(protected::users::delete),
        )
        .route(
            "/api/profile",
            get(protected::profile::show).put(protected::profile::update),
        )
        .route("/api/profile/password", put(protected::profile::change_password))
        .route(
            "/api/uploads",
            post(protected::uploads::upload).layer(protected::uploads::body_limit()),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session::session_guard,
        ));

    Router::new()
        .route("/health", get(health))
        .route(
            "/login",
            get(public::auth::login_page).post(public::auth::login),
        )
        .route("/logout", post(public::auth::logout))
        .merge(guarded)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.repo.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "repository": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "repository unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "repository_error": e.to_string()
                }
            })),
        ),
    }
}
