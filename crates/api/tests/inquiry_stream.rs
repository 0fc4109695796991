//! End-to-end test of the live admin inquiry stream over a real socket.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{admin_token, body_json, delete_auth, patch_json_auth, post_json};
use futures::StreamExt;
use serde_json::json;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Wait for the next text frame and parse it, skipping pings.
async fn next_snapshot(client: &mut Client) -> serde_json::Value {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("a frame should arrive within 5s")
            .expect("stream should stay open")
            .expect("frame should be readable");
        if let Message::Text(text) = message {
            return serde_json::from_str(&text).expect("frame should be JSON");
        }
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stream_follows_status_changes_and_deletes(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = admin_token(app.clone()).await;

    let response = post_json(
        app.clone(),
        "/api/v1/inquiries",
        json!({
            "name": "Sunita Kale",
            "phone": "9822012345",
            "location": "Shevgaon",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_app = app.clone();
    tokio::spawn(async move {
        axum::serve(listener, server_app).await.unwrap();
    });

    let url = format!("ws://{addr}/api/v1/admin/inquiries/stream?token={token}");
    let (mut client, _response) = connect_async(url).await.expect("upgrade should succeed");

    let first = next_snapshot(&mut client).await;
    assert_eq!(first["type"], "inquiries");
    assert!(first["sent_at"].is_string());
    let rows = first["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], id);
    assert_eq!(rows[0]["status"], "new");

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/admin/inquiries/{id}/status"),
        json!({ "status": "contacted" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = next_snapshot(&mut client).await;
    assert_eq!(updated["data"][0]["status"], "contacted");

    let response = delete_auth(app, &format!("/api/v1/admin/inquiries/{id}"), &token).await;
    assert!(response.status().is_success());

    let emptied = next_snapshot(&mut client).await;
    assert_eq!(emptied["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stream_rejects_missing_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let url = format!("ws://{addr}/api/v1/admin/inquiries/stream");
    let err = connect_async(url).await.expect_err("upgrade should be refused");
    match err {
        tokio_tungstenite::tungstenite::Error::Http(response) => {
            assert_eq!(response.status().as_u16(), StatusCode::UNAUTHORIZED.as_u16());
        }
        other => panic!("unexpected error: {other}"),
    }
}
