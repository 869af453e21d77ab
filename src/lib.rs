//! Category service library
//!
//! Query scopes over categories (type, hot and publication filters; order,
//! name and usage sorts) plus the repository and read-only HTTP API built on them.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod queries;
pub mod repositories;

use axum::{http::HeaderValue, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use repositories::CategoryRepository;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub categories: Arc<CategoryRepository>,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let categories = Arc::new(CategoryRepository::new(db.clone()));
        Self {
            db,
            config,
            categories,
        }
    }
}

/// Versioned API routes
pub fn api_v1_routes() -> Router<AppState> {
    Router::new().nest("/categories", handlers::categories::categories_routes())
}

/// Builds the CORS layer from configuration.
///
/// Returns `None` when neither explicit origins nor permissive CORS are allowed.
pub fn cors_layer(cfg: &config::AppConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        Some(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else if cfg.should_allow_permissive_cors() {
        info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        Some(CorsLayer::permissive())
    } else {
        None
    }
}

/// Full application router: health, OpenAPI document and the v1 API
pub fn app_router(state: AppState) -> Router {
    let mut app = Router::<AppState>::new()
        .nest("/health", handlers::health::health_routes())
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::openapi_routes())
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(&state.config) {
        app = app.layer(cors);
    }

    app.with_state(state)
}
