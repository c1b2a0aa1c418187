//! Project visibility, CRUD and image lifecycle.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use agilenesia_api::database::repository::PortfolioRepository;

/// Seeds two tenants with a mixed bag of projects and returns
/// (app, acme_published_id, acme_draft_id, globex_published_id).
async fn seeded() -> (common::TestApp, uuid::Uuid, uuid::Uuid, uuid::Uuid) {
    let app = common::test_app();

    app.repo
        .insert_client(common::client("acme", "Acme Corp", Some("memory://cdn/logos/acme.png")))
        .await;
    app.repo
        .insert_client(common::client("globex", "Globex", None))
        .await;

    let acme_pub = common::project(
        "Agile Transformation",
        Some("acme"),
        "published",
        &["memory://cdn/projects/a1.png", "memory://cdn/projects/a2.png"],
    );
    let acme_draft = common::project("Scrum Rollout", Some("acme"), "draft", &[]);
    let globex_pub = common::project("Kanban Coaching", Some("globex"), "published", &[]);
    let orphan_pub = common::project("Internal Playbook", None, "published", &[]);

    let ids = (acme_pub.id, acme_draft.id, globex_pub.id);
    app.repo.insert_project(acme_pub).await;
    app.repo.insert_project(acme_draft).await;
    app.repo.insert_project(globex_pub).await;
    app.repo.insert_project(orphan_pub).await;

    app.repo
        .insert_user(common::user("admin@agilenesia.id", "hunter2boss", "admin", None))
        .await;
    app.repo
        .insert_user(common::user("pm@acme.example", "correct-horse", "client", Some("acme")))
        .await;

    (app, ids.0, ids.1, ids.2)
}

#[tokio::test]
async fn client_sees_only_published_projects_of_their_tenant() {
    let (app, acme_pub, _, _) = seeded().await;
    let cookie = common::login(&app.router, "pm@acme.example", "correct-horse")
        .await
        .unwrap();

    let (status, _, body) =
        common::send(&app.router, Method::GET, "/api/projects", Some(&cookie), None).await;

    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], acme_pub.to_string());
    assert_eq!(data[0]["status"], "published");
}

#[tokio::test]
async fn admin_sees_every_project_regardless_of_status() {
    let (app, _, _, _) = seeded().await;
    let cookie = common::login(&app.router, "admin@agilenesia.id", "hunter2boss")
        .await
        .unwrap();

    let (status, _, body) =
        common::send(&app.router, Method::GET, "/api/projects", Some(&cookie), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn client_account_without_tenant_sees_nothing() {
    let (app, _, _, _) = seeded().await;
    app.repo
        .insert_user(common::user("floating@nowhere.example", "correct-horse", "client", None))
        .await;

    let cookie = common::login(&app.router, "floating@nowhere.example", "correct-horse")
        .await
        .unwrap();

    let (_, _, body) =
        common::send(&app.router, Method::GET, "/api/projects", Some(&cookie), None).await;

    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn out_of_scope_detail_looks_like_a_missing_project() {
    let (app, _, acme_draft, globex_pub) = seeded().await;
    let cookie = common::login(&app.router, "pm@acme.example", "correct-horse")
        .await
        .unwrap();

    // Own tenant's draft: hidden.
    let (status, _, _) = common::send(
        &app.router,
        Method::GET,
        &format!("/api/projects/{}", acme_draft),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Another tenant's published project: also hidden.
    let (status, _, _) = common::send(
        &app.router,
        Method::GET,
        &format!("/api/projects/{}", globex_pub),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The admin still sees the draft.
    let admin = common::login(&app.router, "admin@agilenesia.id", "hunter2boss")
        .await
        .unwrap();
    let (status, _, body) = common::send(
        &app.router,
        Method::GET,
        &format!("/api/projects/{}", acme_draft),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "draft");
}

#[tokio::test]
async fn cover_image_is_first_gallery_image_or_placeholder() {
    let (app, acme_pub, acme_draft, _) = seeded().await;
    let cookie = common::login(&app.router, "admin@agilenesia.id", "hunter2boss")
        .await
        .unwrap();

    let (_, _, body) = common::send(
        &app.router,
        Method::GET,
        &format!("/api/projects/{}", acme_pub),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(body["data"]["cover_image"], "memory://cdn/projects/a1.png");

    let (_, _, body) = common::send(
        &app.router,
        Method::GET,
        &format!("/api/projects/{}", acme_draft),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(body["data"]["cover_image"], "/placeholder.svg");
}

#[tokio::test]
async fn non_admin_cannot_write_projects() {
    let (app, acme_pub, _, _) = seeded().await;
    let cookie = common::login(&app.router, "pm@acme.example", "correct-horse")
        .await
        .unwrap();

    let input = json!({
        "title": "Sneaky",
        "client_id": "acme",
        "category": "Coaching",
        "duration": "1 month",
        "description": "",
        "status": "draft"
    });

    let (status, _, _) = common::send(
        &app.router,
        Method::POST,
        "/api/projects",
        Some(&cookie),
        Some(input),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = common::send(
        &app.router,
        Method::DELETE,
        &format!("/api/projects/{}", acme_pub),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_denormalizes_client_fields_from_the_clients_table() {
    let (app, _, _, _) = seeded().await;
    let cookie = common::login(&app.router, "admin@agilenesia.id", "hunter2boss")
        .await
        .unwrap();

    let input = json!({
        "title": "OKR Workshop",
        "client_id": "acme",
        "category": "Training",
        "duration": "2 weeks",
        "description": "<p>Workshop series</p>",
        "status": "draft",
        "gallery": [{ "url": "memory://cdn/projects/okr.png", "alt": "Workshop" }]
    });

    let (status, _, body) = common::send(
        &app.router,
        Method::POST,
        "/api/projects",
        Some(&cookie),
        Some(input),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["client_name"], "Acme Corp");
    assert_eq!(body["data"]["client_logo_url"], "memory://cdn/logos/acme.png");
    assert_eq!(body["data"]["cover_image"], "memory://cdn/projects/okr.png");
}

#[tokio::test]
async fn create_with_unknown_client_is_rejected() {
    let (app, _, _, _) = seeded().await;
    let cookie = common::login(&app.router, "admin@agilenesia.id", "hunter2boss")
        .await
        .unwrap();

    let input = json!({
        "title": "Dangling",
        "client_id": "no-such-client",
        "category": "Coaching",
        "duration": "1 month",
        "description": "",
        "status": "draft"
    });

    let (status, _, _) = common::send(
        &app.router,
        Method::POST,
        "/api/projects",
        Some(&cookie),
        Some(input),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_releases_only_the_images_that_were_dropped() {
    let (app, acme_pub, _, _) = seeded().await;
    app.storage.seed_object("memory://cdn/projects/a1.png").await;
    app.storage.seed_object("memory://cdn/projects/a2.png").await;

    let cookie = common::login(&app.router, "admin@agilenesia.id", "hunter2boss")
        .await
        .unwrap();

    // Keep a2, drop a1.
    let input = json!({
        "title": "Agile Transformation",
        "client_id": "acme",
        "category": "Coaching",
        "duration": "6 months",
        "description": "<p>Engagement</p>",
        "status": "published",
        "gallery": [{ "url": "memory://cdn/projects/a2.png", "alt": "image" }]
    });

    let (status, _, _) = common::send(
        &app.router,
        Method::PUT,
        &format!("/api/projects/{}", acme_pub),
        Some(&cookie),
        Some(input),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let deletes = app.storage.delete_calls().await;
    assert_eq!(deletes, vec!["memory://cdn/projects/a1.png".to_string()]);
    assert!(app.storage.contains("memory://cdn/projects/a2.png").await);
    assert!(!app.storage.contains("memory://cdn/projects/a1.png").await);
}

#[tokio::test]
async fn delete_removes_the_record_then_releases_its_images() {
    let (app, acme_pub, _, _) = seeded().await;
    app.storage.seed_object("memory://cdn/projects/a1.png").await;
    app.storage.seed_object("memory://cdn/projects/a2.png").await;

    let cookie = common::login(&app.router, "admin@agilenesia.id", "hunter2boss")
        .await
        .unwrap();

    let (status, _, _) = common::send(
        &app.router,
        Method::DELETE,
        &format!("/api/projects/{}", acme_pub),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert!(app.repo.get_project(acme_pub).await.unwrap().is_none());
    let deletes = app.storage.delete_calls().await;
    assert_eq!(deletes.len(), 2);

    // Second delete is a plain 404; storage is not touched again.
    let (status, _, _) = common::send(
        &app.router,
        Method::DELETE,
        &format!("/api/projects/{}", acme_pub),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.storage.delete_calls().await.len(), 2);
}

#[tokio::test]
async fn home_lists_summaries_for_the_caller_scope() {
    let (app, acme_pub, _, _) = seeded().await;
    let cookie = common::login(&app.router, "pm@acme.example", "correct-horse")
        .await
        .unwrap();

    let (status, _, body) = common::send(&app.router, Method::GET, "/", Some(&cookie), None).await;

    assert_eq!(status, StatusCode::OK);
    let projects = body["data"]["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["id"], acme_pub.to_string());
    assert_eq!(projects[0]["cover_image"], "memory://cdn/projects/a1.png");
}
