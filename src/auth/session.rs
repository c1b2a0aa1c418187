use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{Identity, SESSION_COOKIE_NAME};
use crate::config;

/// Claims carried in the session token.
///
/// The token is an HMAC-signed JWT over these claims, so a cookie holder
/// cannot edit their role or tenant reference; tampering fails at decode.
/// Role and status are still re-validated against the repository on every
/// request, so the claims here are only a lookup key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub role: String,
    pub name: String,
    pub email: String,
    pub status: String,
    pub client_id: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(identity: &Identity) -> Self {
        let now = Utc::now();
        let ttl_hours = config::config().security.session_ttl_hours;

        Self {
            sub: identity.id,
            role: identity.role.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            status: identity.status.clone(),
            client_id: identity.client_id.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(ttl_hours)).timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum SessionError {
    TokenGeneration(String),
    TokenInvalid(String),
    TokenExpired,
    InvalidSecret,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::TokenGeneration(msg) => write!(f, "session token generation error: {}", msg),
            SessionError::TokenInvalid(msg) => write!(f, "invalid session token: {}", msg),
            SessionError::TokenExpired => write!(f, "session token expired"),
            SessionError::InvalidSecret => write!(f, "invalid session secret"),
        }
    }
}

impl std::error::Error for SessionError {}

pub fn encode_session(claims: &SessionClaims) -> Result<String, SessionError> {
    let secret = &config::config().security.session_secret;

    if secret.is_empty() {
        return Err(SessionError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| SessionError::TokenGeneration(e.to_string()))
}

pub fn decode_session(token: &str) -> Result<SessionClaims, SessionError> {
    let secret = &config::config().security.session_secret;

    if secret.is_empty() {
        return Err(SessionError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<SessionClaims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::TokenExpired,
            _ => SessionError::TokenInvalid(e.to_string()),
        })
}

/// Build the session cookie around an encoded token: HTTP-only, path `/`,
/// `Secure` in production, expiring with the token.
pub fn session_cookie(token: String) -> Cookie<'static> {
    let security = &config::config().security;

    Cookie::build((SESSION_COOKIE_NAME, token))
        .http_only(true)
        .secure(security.secure_cookies)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::hours(security.session_ttl_hours))
        .build()
}
