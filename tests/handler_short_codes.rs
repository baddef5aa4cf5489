mod common;

use axum_test::TestServer;
use common::{ADMIN_KEY, API_KEY_HEADER};
use serde_json::json;
use uuid::Uuid;

async fn server() -> TestServer {
    common::create_test_server().await.0
}

#[tokio::test]
async fn test_create_short_code() {
    let server = server().await;

    let response = server
        .post("/api/v1/shorturl")
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .json(&json!({
            "code": "abc123",
            "redirectUrl": "https://example.com",
            "note": "landing page"
        }))
        .await;

    assert_eq!(response.status_code(), 201);
    let body = response.json::<serde_json::Value>();
    let id = body["id"].as_str().unwrap();
    assert_eq!(
        response.header("location"),
        format!("/api/v1/shorturl/{id}").as_str()
    );
    assert_eq!(body["code"], "abc123");
    assert_eq!(body["redirectUrl"], "https://example.com");
    assert_eq!(body["note"], "landing page");
    assert!(body["createdAt"].is_string());
    assert!(body["deletedAt"].is_null());
}

#[tokio::test]
async fn test_create_generates_code() {
    let server = server().await;

    let body = common::create_short_code(&server, None, "https://example.com").await;

    let code = body["code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn test_create_blank_code_generates_code() {
    let server = server().await;

    let body = common::create_short_code(&server, Some("  "), "https://example.com").await;

    assert_eq!(body["code"].as_str().unwrap().len(), 6);
}

#[tokio::test]
async fn test_create_with_id_rejected() {
    let server = server().await;

    let response = server
        .post("/api/v1/shorturl")
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .json(&json!({
            "id": Uuid::new_v4(),
            "redirectUrl": "https://example.com"
        }))
        .await;

    response.assert_status_bad_request();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["message"], "id must be null");
}

#[tokio::test]
async fn test_create_duplicate_live_code() {
    let server = server().await;
    common::create_short_code(&server, Some("dup"), "https://one.example.com").await;

    let response = server
        .post("/api/v1/shorturl")
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .json(&json!({ "code": "dup", "redirectUrl": "https://two.example.com" }))
        .await;

    assert_eq!(response.status_code(), 409);
    assert_eq!(response.json::<serde_json::Value>()["error"]["code"], "conflict");
}

#[tokio::test]
async fn test_create_too_long_code() {
    let server = server().await;

    let response = server
        .post("/api/v1/shorturl")
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .json(&json!({ "code": "x".repeat(144), "redirectUrl": "https://example.com" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_create_rejects_bad_destination() {
    let server = server().await;

    for url in ["not-a-url", "javascript:alert(1)", "ftp://example.com/file"] {
        let response = server
            .post("/api/v1/shorturl")
            .add_header(API_KEY_HEADER, ADMIN_KEY)
            .json(&json!({ "code": "bad", "redirectUrl": url }))
            .await;

        response.assert_status_bad_request();
    }
}

#[tokio::test]
async fn test_get_by_id() {
    let server = server().await;
    let created = common::create_short_code(&server, Some("byid"), "https://example.com").await;
    let id = created["id"].as_str().unwrap();

    let response = server
        .get(&format!("/api/v1/shorturl/{id}"))
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["code"], "byid");
}

#[tokio::test]
async fn test_get_unknown_id() {
    let server = server().await;

    let response = server
        .get(&format!("/api/v1/shorturl/{}", Uuid::new_v4()))
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_get_by_code() {
    let server = server().await;
    common::create_short_code(&server, Some("lookup"), "https://example.com").await;

    let response = server
        .get("/api/v1/shorturl/code/lookup")
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>()["redirectUrl"],
        "https://example.com"
    );

    server
        .get("/api/v1/shorturl/code/missing")
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_update_short_code() {
    let server = server().await;
    let created = common::create_short_code(&server, Some("old"), "https://old.example.com").await;
    let id = created["id"].as_str().unwrap();

    let response = server
        .put(&format!("/api/v1/shorturl/{id}"))
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .json(&json!({ "code": "new", "redirectUrl": "https://new.example.com" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["id"], id);
    assert_eq!(body["code"], "new");

    server.get("/old").await.assert_status_not_found();
    assert_eq!(
        server.get("/new").await.header("location"),
        "https://new.example.com"
    );
}

#[tokio::test]
async fn test_update_keeping_own_code() {
    let server = server().await;
    let created = common::create_short_code(&server, Some("same"), "https://a.example.com").await;
    let id = created["id"].as_str().unwrap();

    let response = server
        .put(&format!("/api/v1/shorturl/{id}"))
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .json(&json!({ "code": "same", "redirectUrl": "https://b.example.com" }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        server.get("/same").await.header("location"),
        "https://b.example.com"
    );
}

#[tokio::test]
async fn test_update_unknown_id() {
    let server = server().await;

    let response = server
        .put(&format!("/api/v1/shorturl/{}", Uuid::new_v4()))
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .json(&json!({ "code": "x", "redirectUrl": "https://example.com" }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_delete_returns_entry() {
    let server = server().await;
    let created = common::create_short_code(&server, Some("del"), "https://example.com").await;
    let id = created["id"].as_str().unwrap();

    let response = server
        .delete(&format!("/api/v1/shorturl/{id}"))
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["code"], "del");
    assert!(body["deletedAt"].is_string());
}

#[tokio::test]
async fn test_delete_unknown_id() {
    let server = server().await;

    let response = server
        .delete(&format!("/api/v1/shorturl/{}", Uuid::new_v4()))
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_list_includes_deleted_entries() {
    let server = server().await;
    common::create_short_code(&server, Some("keep"), "https://example.com").await;
    let gone = common::create_short_code(&server, Some("drop"), "https://example.com").await;
    let id = gone["id"].as_str().unwrap();
    server
        .delete(&format!("/api/v1/shorturl/{id}"))
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .await
        .assert_status_ok();

    let response = server
        .get("/api/v1/shorturl")
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .await;

    response.assert_status_ok();
    let body = response.json::<Vec<serde_json::Value>>();
    assert_eq!(body.len(), 2);
    assert!(body.iter().any(|e| e["code"] == "drop" && e["deletedAt"].is_string()));
}

#[tokio::test]
async fn test_deleted_code_can_be_reused() {
    let server = server().await;
    let first = common::create_short_code(&server, Some("abc123"), "http://x.test").await;
    let first_id = first["id"].as_str().unwrap();

    server
        .delete(&format!("/api/v1/shorturl/{first_id}"))
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .await
        .assert_status_ok();
    server.get("/abc123").await.assert_status_not_found();

    let second = common::create_short_code(&server, Some("abc123"), "http://y.test").await;

    assert_ne!(second["id"], first["id"]);
    assert_eq!(server.get("/abc123").await.header("location"), "http://y.test");
}
