use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A coached organization (tenant). `id` is a stable slug referenced by
/// `users.client_id` and `projects.client_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub industry: String,
    pub logo_url: Option<String>,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInput {
    pub id: String,
    pub name: String,
    pub industry: String,
    pub logo_url: Option<String>,
    pub status: String,
}

/// Full-replace update for an existing client (the slug itself is immutable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientChanges {
    pub name: String,
    pub industry: String,
    pub logo_url: Option<String>,
    pub status: String,
}
