mod common;

use axum_test::TestServer;
use common::{ADMIN_KEY, API_KEY_HEADER};
use serde_json::json;
use short_url::routes::router;
use sqlx::PgPool;

#[sqlx::test]
async fn test_create_redirect_delete_against_postgres(pool: PgPool) {
    let state = common::create_pg_state(pool).await;
    let server = TestServer::new(router(state)).unwrap();

    let created = server
        .post("/api/v1/shorturl")
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .json(&json!({ "code": "pgflow", "redirectUrl": "https://example.com" }))
        .await;
    assert_eq!(created.status_code(), 201);
    let id = created.json::<serde_json::Value>()["id"]
        .as_str()
        .unwrap()
        .to_string();

    assert_eq!(server.get("/pgflow").await.status_code(), 302);

    server
        .delete(&format!("/api/v1/shorturl/{id}"))
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .await
        .assert_status_ok();

    server.get("/pgflow").await.assert_status_not_found();
}
