use std::sync::Arc;

use agilenesia_api::database::postgres::PgRepository;
use agilenesia_api::storage::HttpObjectStorage;
use agilenesia_api::{app, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SESSION_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = agilenesia_api::config::config();
    tracing::info!("Starting Agilenesia API in {:?} mode", config.environment);

    if config.security.session_secret.is_empty() {
        panic!("SESSION_SECRET must be set");
    }

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let repo = PgRepository::connect(&database_url)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to database: {}", e));

    let state = AppState {
        repo: Arc::new(repo),
        storage: Arc::new(HttpObjectStorage::from_config()),
    };

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("AGILENESIA_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Agilenesia API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
