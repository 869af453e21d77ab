#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

use category_service::{
    config::AppConfig,
    db::{self, DbConfig},
    entities::category,
    repositories::{CategoryRepository, NewCategory},
    AppState,
};

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        Self::with_pool(setup_db().await)
    }

    /// Construct a test application over an existing connection.
    pub fn with_pool(pool: DatabaseConnection) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg.api_default_page_size = 2;
        cfg.api_max_page_size = 3;

        let state = AppState::new(Arc::new(pool), cfg);
        let router = category_service::app_router(state.clone());

        Self { router, state }
    }

    pub fn repo(&self) -> &CategoryRepository {
        &self.state.categories
    }

    /// Send a GET request against the router
    pub async fn get(&self, uri: &str) -> axum::response::Response {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("failed to build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

/// Fresh in-memory database with the schema applied
pub async fn setup_db() -> DatabaseConnection {
    let pool = db::establish_connection_with_config(&DbConfig::sqlite_memory())
        .await
        .expect("failed to create test database");
    db::run_migrations(&pool)
        .await
        .expect("failed to run migrations in tests");
    pool
}

pub fn repository(pool: DatabaseConnection) -> CategoryRepository {
    CategoryRepository::new(Arc::new(pool))
}

pub async fn seed(repo: &CategoryRepository, input: NewCategory) -> category::Model {
    repo.create(input).await.expect("seed category for tests")
}

/// Attach `count` distinct records of `kind` to the category
pub async fn tag(repo: &CategoryRepository, category_id: i32, kind: &str, count: i32) {
    for categoryable_id in 1..=count {
        repo.attach(category_id, kind, categoryable_id)
            .await
            .expect("attach categoryable for tests");
    }
}

/// A(2 x post), B(no links), C(1 x page), created in that order
pub async fn seed_usage_fixture(
    repo: &CategoryRepository,
) -> (category::Model, category::Model, category::Model) {
    let a = seed(repo, NewCategory::new("A", "news")).await;
    let b = seed(repo, NewCategory::new("B", "news")).await;
    let c = seed(repo, NewCategory::new("C", "news")).await;
    tag(repo, a.id, "post", 2).await;
    tag(repo, c.id, "page", 1).await;
    (a, b, c)
}

pub fn ids(models: &[category::Model]) -> Vec<i32> {
    models.iter().map(|m| m.id).collect()
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read response body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("response body is not json")
}
