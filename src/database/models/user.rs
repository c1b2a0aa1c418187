use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const STATUS_ACTIVE: &str = "active";

/// A login-capable actor. `role` and `status` stay as stored text; the
/// authorization layer parses them fail-closed (see `auth::Role`).
///
/// Exactly one of {role=admin} or {role=client with a client_id} is expected
/// per identity used for scoping; a client-role user without a client_id
/// simply sees no tenant-scoped projects.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub client_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

/// Fields accepted when creating a user. Passwords are hashed before this
/// struct is built; plaintext never crosses the repository boundary.
#[derive(Debug, Clone)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub client_id: Option<String>,
}

/// Partial update for a user; `None` fields are left untouched. The outer
/// `Option` on `client_id` distinguishes "no change" from "clear the
/// reference".
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub client_id: Option<Option<String>>,
}
