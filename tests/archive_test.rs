mod helpers;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use helpers::{setup_test_app, setup_with_informations};
use registry_server::{
    models::information::{Information, InformationFilter, NewInformation},
    services::{StoreError, StoreResult, information_repository::InformationRepository},
};
use serde_json::{Value, json};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Store that counts calls and fails every one of them.
#[derive(Default)]
struct CountingStore {
    calls: AtomicUsize,
}

impl CountingStore {
    fn fail<T>(&self) -> StoreResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Sqlx(sqlx::Error::PoolClosed))
    }
}

#[async_trait]
impl InformationRepository for CountingStore {
    async fn list(&self, _filter: InformationFilter) -> StoreResult<Vec<Information>> {
        self.fail()
    }
    async fn find(&self, _id: i64) -> StoreResult<Information> {
        self.fail()
    }
    async fn create(&self, _new: NewInformation) -> StoreResult<Information> {
        self.fail()
    }
    async fn delete(&self, _id: i64) -> StoreResult<()> {
        self.fail()
    }
    async fn set_archived(
        &self,
        _id: i64,
        _archived: bool,
        _at: DateTime<Utc>,
    ) -> StoreResult<Information> {
        self.fail()
    }
}

async fn create_information(app: &helpers::TestApp) -> i64 {
    let response = app
        .client()
        .post("/api/admin/informations")
        .json(&json!({ "content": "Seen at the bus terminal" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<Value>()["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_archive_sets_flag_and_timestamp() {
    let app = setup_test_app().await;
    let id = create_information(&app).await;

    let before = Utc::now();
    let response = app
        .client()
        .patch(&format!("/api/admin/informations/{}/archive", id))
        .json(&json!({ "archived": true }))
        .await;
    let after = Utc::now();

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Information archived successfully");
    assert_eq!(body["data"]["archived"], true);

    let archived_at: DateTime<Utc> = body["data"]["archivedAt"].as_str().unwrap().parse().unwrap();
    assert!(archived_at >= before && archived_at <= after);
    let updated_at: DateTime<Utc> = body["data"]["updatedAt"].as_str().unwrap().parse().unwrap();
    assert_eq!(updated_at, archived_at);
}

#[tokio::test]
async fn test_unarchive_clears_timestamp() {
    let app = setup_test_app().await;
    let id = create_information(&app).await;
    let url = format!("/api/admin/informations/{}/archive", id);

    app.client().patch(&url).json(&json!({ "archived": true })).await;
    let response = app.client().patch(&url).json(&json!({ "archived": false })).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Information unarchived successfully");
    assert_eq!(body["data"]["archived"], false);
    assert!(body["data"]["archivedAt"].is_null());
}

#[tokio::test]
async fn test_non_boolean_flag_is_rejected_without_store_call() {
    let store = Arc::new(CountingStore::default());
    let app = setup_with_informations(store.clone()).await;

    for body in [
        json!({ "archived": "yes" }),
        json!({ "archived": 1 }),
        json!({}),
    ] {
        let response = app
            .client()
            .patch("/api/admin/informations/1/archive")
            .json(&body)
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    let response = app
        .client()
        .patch("/api/admin/informations/1/archive")
        .text("archived=true")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_store_failure_is_generic_server_error() {
    let store = Arc::new(CountingStore::default());
    let app = setup_with_informations(store.clone()).await;

    let response = app
        .client()
        .patch("/api/admin/informations/1/archive")
        .json(&json!({ "archived": true }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["error"], "Internal server error");
    assert_eq!(store.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_archiving_missing_record_is_server_error() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .patch("/api/admin/informations/999/archive")
        .json(&json!({ "archived": true }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["error"], "Internal server error");
}

#[tokio::test]
async fn test_malformed_id_is_json_bad_request_without_store_call() {
    let store = Arc::new(CountingStore::default());
    let app = setup_with_informations(store.clone()).await;

    let response = app
        .client()
        .patch("/api/admin/informations/abc/archive")
        .json(&json!({ "archived": true }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}
