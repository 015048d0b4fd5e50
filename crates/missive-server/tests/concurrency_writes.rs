mod common;

use axum::http::StatusCode;
use common::{body_json, json_request, setup_app};
use serde_json::json;
use std::collections::HashSet;
use tower::ServiceExt;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_receive_distinct_ids() {
    let app = setup_app();

    let mut handles = Vec::new();
    for i in 0..32 {
        let router = app.router.clone();
        handles.push(tokio::spawn(async move {
            let response = router
                .oneshot(json_request(
                    "POST",
                    json!({ "message": format!("msg-{i}") }).to_string(),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
            body_json(response).await["id"].as_i64().unwrap()
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        assert!(ids.insert(handle.await.unwrap()), "duplicate id assigned");
    }
    assert_eq!(ids.len(), 32);

    let listed = app.list().await;
    assert_eq!(listed.as_array().unwrap().len(), 32);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_updates_to_one_row_leave_one_of_the_written_values() {
    let app = setup_app();
    let id = app.create("initial").await;

    let mut handles = Vec::new();
    for i in 0..16 {
        let router = app.router.clone();
        handles.push(tokio::spawn(async move {
            let response = router
                .oneshot(json_request(
                    "PUT",
                    json!({ "id": id, "message": format!("writer-{i}") }).to_string(),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let listed = app.list().await;
    let rows = listed.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], id);
    assert!(rows[0]["message"]
        .as_str()
        .unwrap()
        .starts_with("writer-"));
}
