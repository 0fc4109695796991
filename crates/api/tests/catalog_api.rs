//! HTTP-level tests for products, testimonials and worked sites.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, get_auth, post_json, post_json_auth, put_json_auth,
};
use serde_json::json;
use sqlx::PgPool;

fn product_body(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "subtitle": "Ideal for small homes",
        "price": "1,45,000",
        "features": ["8 panels", "", "5 year warranty"],
        "popular": true,
        "icon": "Home",
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_lists_start_empty(pool: PgPool) {
    let app = common::build_test_app(pool);

    for uri in ["/api/v1/products", "/api/v1/testimonials", "/api/v1/worked-sites"] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(body_json(response).await["data"], json!([]), "{uri}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_lists_degrade_when_database_is_gone(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    pool.close().await;

    let response = get(app, "/api/v1/products").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_product_requires_admin(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/admin/products", product_body("3kW Home")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_product_lifecycle(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::admin_token(app.clone()).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/products",
        product_body("3kW <b>Home</b>"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await["data"].clone();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "3kW Home");
    assert_eq!(created["features"], json!(["8 panels", "5 year warranty"]));
    assert_eq!(created["display_order"], 1);

    let mut update = product_body("5kW Home");
    update["icon"] = json!("Building");
    let response =
        put_json_auth(app.clone(), &format!("/api/v1/admin/products/{id}"), update, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["name"], "5kW Home");
    assert_eq!(updated["icon"], "Building");
    assert_eq!(updated["display_order"], 1, "omitted order keeps position");

    let response = get(app.clone(), "/api/v1/products").await;
    assert_eq!(body_json(response).await["data"][0]["id"], id);

    let response = delete_auth(app.clone(), &format!("/api/v1/admin/products/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &format!("/api/v1/admin/products/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_product_requires_name_and_price(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::admin_token(app.clone()).await;

    let response = post_json_auth(
        app,
        "/api/v1/admin/products",
        json!({ "name": "<b></b>", "price": "  " }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["fields"]["name"], "Name is required.");
    assert_eq!(json["fields"]["price"], "Price is required.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_icon_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::admin_token(app.clone()).await;

    let mut body = product_body("3kW Home");
    body["icon"] = json!("Rocket");
    let response = post_json_auth(app, "/api/v1/admin/products", body, &token).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_product_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::admin_token(app.clone()).await;

    let response = put_json_auth(
        app,
        "/api/v1/admin/products/9999",
        product_body("Ghost"),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_testimonial_rating_defaults_and_bounds(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::admin_token(app.clone()).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/testimonials",
        json!({ "customer_name": "Rahul", "location": "Nashik", "review": "Bills dropped to zero" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["rating"], 5);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/testimonials",
        json!({ "customer_name": "Rahul", "location": "Nashik", "review": "Great", "rating": 6 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["fields"]["rating"],
        "Rating must be between 1 and 5."
    );

    let response = get(app, "/api/v1/testimonials").await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_worked_site_lifecycle(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::admin_token(app.clone()).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/worked-sites",
        json!({
            "title": "Rooftop at Savedi",
            "location": "Ahmednagar",
            "system_size": "5kW",
            "image_url": "   ",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let site = body_json(response).await["data"].clone();
    assert!(site["image_url"].is_null(), "blank image url is dropped");
    let id = site["id"].as_i64().unwrap();

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/admin/worked-sites/{id}"),
        json!({ "title": "", "location": "Ahmednagar" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["fields"]["title"], "Title is required.");

    let response =
        delete_auth(app.clone(), &format!("/api/v1/admin/worked-sites/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response =
        delete_auth(app, &format!("/api/v1/admin/worked-sites/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
