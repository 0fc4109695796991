//! HTTP-level tests for the contact form and admin inquiry management.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, get_auth, patch_json_auth, post_json};
use serde_json::json;
use sqlx::PgPool;

fn contact() -> serde_json::Value {
    json!({
        "name": "Ganesh Pawar",
        "email": "ganesh@example.com",
        "phone": "98765-43210",
        "location": "Ahmednagar",
        "energy_needs": "5kw",
        "message": "Call after <b>6pm</b>",
    })
}

async fn submit(app: axum::Router) -> serde_json::Value {
    let response = post_json(app, "/api/v1/inquiries", contact()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_normalizes_and_starts_new(pool: PgPool) {
    let app = common::build_test_app(pool);

    let inquiry = submit(app).await;

    assert_eq!(inquiry["phone"], "+91 9876543210");
    assert_eq!(inquiry["status"], "new");
    assert_eq!(inquiry["energy_needs"], "5kw");
    assert_eq!(inquiry["message"], "Call after 6pm");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_reports_every_bad_field(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app,
        "/api/v1/inquiries",
        json!({
            "name": " ",
            "email": "not-an-email",
            "phone": "12345",
            "location": "Pune",
            "energy_needs": "10kw",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let fields = body_json(response).await["fields"].clone();
    assert_eq!(fields["name"], "Name is required.");
    assert_eq!(fields["phone"], "Please enter a valid 10-digit phone number.");
    assert_eq!(fields["email"], "Please enter a valid email address.");
    assert!(fields["energy_needs"].is_string());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inquiries")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "invalid submissions never reach the store");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_list_requires_session(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/admin/inquiries").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_update_and_delete(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::admin_token(app.clone()).await;
    let id = submit(app.clone()).await["id"].as_i64().unwrap();

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/admin/inquiries/{id}/status"),
        json!({ "status": "contacted" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "contacted");

    let response = get_auth(app.clone(), "/api/v1/admin/inquiries", &token).await;
    let list = body_json(response).await["data"].clone();
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["status"], "contacted");

    let response = delete_auth(app.clone(), &format!("/api/v1/admin/inquiries/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &format!("/api/v1/admin/inquiries/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_status_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::admin_token(app.clone()).await;
    let id = submit(app.clone()).await["id"].as_i64().unwrap();

    let response = patch_json_auth(
        app,
        &format!("/api/v1/admin/inquiries/{id}/status"),
        json!({ "status": "archived" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_update_for_missing_inquiry_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::admin_token(app.clone()).await;

    let response = patch_json_auth(
        app,
        "/api/v1/admin/inquiries/4242/status",
        json!({ "status": "closed" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
