#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use missive_db::{create_pool, init_schema, DbPool, DbRuntimeSettings};
use missive_server::{app, AppState};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// An isolated server backed by its own SQLite file.
///
/// The temp directory must outlive the pool, so it travels with it.
pub struct TestApp {
    pub router: Router,
    pub pool: DbPool,
    _dir: TempDir,
}

pub fn setup_app() -> TestApp {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("messages.db");
    let pool = create_pool(
        path.to_str().expect("temp path should be utf-8"),
        DbRuntimeSettings::default(),
    )
    .expect("failed to create pool");
    {
        let conn = pool.get().expect("failed to get connection");
        init_schema(&conn).expect("failed to create schema");
    }

    let router = app(AppState { pool: pool.clone() });
    TestApp {
        router,
        pool,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn list(&self) -> Value {
        let response = self.send(get_messages()).await;
        assert_eq!(response.status(), 200);
        body_json(response).await
    }

    /// Creates a message over HTTP and returns its assigned id.
    pub async fn create(&self, text: &str) -> i64 {
        let response = self
            .send(json_request(
                "POST",
                serde_json::json!({ "message": text }).to_string(),
            ))
            .await;
        assert_eq!(response.status(), 201);
        body_json(response).await["id"].as_i64().unwrap()
    }
}

pub fn get_messages() -> Request<Body> {
    Request::builder()
        .uri("/messages")
        .method("GET")
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .uri("/messages")
        .method(method)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub fn delete_request(query: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/messages{query}"))
        .method("DELETE")
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
