#![allow(dead_code)]

use axum_test::TestServer;
use chrono::Utc;
use registry_server::{
    db,
    routes::routes::app,
    services::{information_repository::InformationRepository, upload_service::UploadService},
    state::AppState,
};
use sqlx::SqlitePool;
use std::{path::PathBuf, sync::Arc};
use tempfile::TempDir;

/// Body limit used by the test router.
pub const TEST_BODY_LIMIT: usize = 4 * 1024 * 1024;

/// Test application state
pub struct TestApp {
    pub server: TestServer,
    pub pool: SqlitePool,
    pub upload_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    /// Get the HTTP test client
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Setup a test application with an in-memory database and an isolated
/// upload directory that does not exist yet.
pub async fn setup_test_app() -> TestApp {
    build(|state| state).await
}

/// Same as `setup_test_app` but with a replacement information store.
pub async fn setup_with_informations(repo: Arc<dyn InformationRepository>) -> TestApp {
    build(move |state| state.with_informations(repo)).await
}

async fn build(customize: impl FnOnce(AppState) -> AppState) -> TestApp {
    let pool = db::connect_in_memory()
        .await
        .expect("Failed to create test database");

    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let upload_dir = temp_dir.path().join("public/uploads");

    let state = customize(AppState::new(pool.clone(), UploadService::new(&upload_dir)));
    let server = TestServer::new(app(state, TEST_BODY_LIMIT).into_make_service())
        .expect("Failed to create test server");

    TestApp {
        server,
        pool,
        upload_dir,
        _temp_dir: temp_dir,
    }
}

/// Insert a person and return its id. Later calls sort as newer.
pub async fn seed_person(pool: &SqlitePool, full_name: &str, located: bool) -> i64 {
    let now = Utc::now();
    sqlx::query_scalar(
        "INSERT INTO persons (full_name, located, located_at, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(full_name)
    .bind(located)
    .bind(located.then_some(now))
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .expect("Failed to seed person")
}
