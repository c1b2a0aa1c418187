#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::Value;
use sqlx::types::Json;
use tower::ServiceExt;
use uuid::Uuid;

use agilenesia_api::auth::password::hash_password;
use agilenesia_api::database::models::client::Client;
use agilenesia_api::database::models::project::{GalleryImage, Project};
use agilenesia_api::database::models::user::User;
use agilenesia_api::database::repository::PortfolioRepository;
use agilenesia_api::storage::ObjectStorage;
use agilenesia_api::testing::{MemoryRepository, MemoryStorage};
use agilenesia_api::{app, AppState};

pub struct TestApp {
    pub repo: Arc<MemoryRepository>,
    pub storage: Arc<MemoryStorage>,
    pub router: Router,
}

pub fn test_app() -> TestApp {
    let repo = Arc::new(MemoryRepository::new());
    let storage = Arc::new(MemoryStorage::new());
    let router = app(AppState {
        repo: repo.clone() as Arc<dyn PortfolioRepository>,
        storage: storage.clone() as Arc<dyn ObjectStorage>,
    });

    TestApp {
        repo,
        storage,
        router,
    }
}

pub fn user(email: &str, password: &str, role: &str, client_id: Option<&str>) -> User {
    User {
        id: Uuid::new_v4(),
        name: email.split('@').next().unwrap_or("user").to_string(),
        email: email.to_string(),
        password_hash: hash_password(password).expect("hashing failed"),
        role: role.to_string(),
        status: "active".to_string(),
        client_id: client_id.map(|s| s.to_string()),
        updated_at: Utc::now(),
    }
}

pub fn client(id: &str, name: &str, logo_url: Option<&str>) -> Client {
    Client {
        id: id.to_string(),
        name: name.to_string(),
        industry: "Technology".to_string(),
        logo_url: logo_url.map(|s| s.to_string()),
        status: "active".to_string(),
        updated_at: Utc::now(),
    }
}

pub fn project(title: &str, client_id: Option<&str>, status: &str, images: &[&str]) -> Project {
    Project {
        id: Uuid::new_v4(),
        title: title.to_string(),
        client_id: client_id.map(|s| s.to_string()),
        client_name: client_id.unwrap_or("").to_string(),
        client_logo_url: None,
        category: "Coaching".to_string(),
        duration: "6 months".to_string(),
        description: "<p>Engagement</p>".to_string(),
        status: status.to_string(),
        gallery: Json(
            images
                .iter()
                .map(|url| GalleryImage {
                    url: url.to_string(),
                    alt: "image".to_string(),
                    caption: None,
                })
                .collect(),
        ),
        products: Json(vec![]),
        squad: Json(vec![]),
        agency_squad: Json(vec![]),
        updated_at: Utc::now(),
    }
}

/// POST the login form; on success returns the `name=value` cookie pair to
/// send back on subsequent requests.
pub async fn login(router: &Router, email: &str, password: &str) -> Option<String> {
    let body = format!("email={}&password={}", email, password);
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.to_string())
}

/// Fire one request at the router and return (status, headers, parsed body).
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    json_body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match json_body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, headers, body)
}

/// Send a single-file multipart upload to /api/uploads.
pub async fn send_upload(
    router: &Router,
    cookie: &str,
    uri: &str,
    filename: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> (StatusCode, Value) {
    const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(&bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}
