pub mod password;
pub mod scope;
pub mod session;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::user::User;

/// Name of the browser cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "agilenesia_session";

/// Roles understood by the authorization layer. Anything else stored in the
/// users table parses to `Unknown` and is granted no more than anonymous
/// visibility (fail closed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Client,
    Unknown,
}

impl Role {
    pub fn parse(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            "client" => Role::Client,
            _ => Role::Unknown,
        }
    }
}

/// Authenticated actor, as re-fetched from the repository on every request.
/// The session cookie is only the lookup key; this struct is always built
/// from the authoritative user record, never from cookie contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub client_id: Option<String>,
}

impl Identity {
    pub fn role(&self) -> Role {
        Role::parse(&self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            status: user.status,
            client_id: user.client_id,
        }
    }
}
