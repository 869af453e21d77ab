use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Category Service API",
        version = "1.0.0",
        description = "Read API over categories: filter by type, hot flag and publication state; sort by manual order, name or usage count."
    ),
    paths(
        crate::handlers::categories::list_categories,
        crate::handlers::categories::list_category_usage,
        crate::handlers::categories::get_category,
        crate::handlers::health::health_check,
    ),
    components(
        schemas(
            crate::handlers::categories::CategoryResponse,
            crate::handlers::categories::CategoryUsageResponse,
            crate::handlers::categories::CategoryPage,
            crate::handlers::categories::CategoryUsagePage,
            crate::handlers::common::PaginationMeta,
            crate::handlers::health::HealthResponse,
            crate::handlers::health::ComponentStatus,
            crate::queries::CategorySort,
            crate::errors::ErrorResponse
        )
    ),
    tags(
        (name = "Categories", description = "Category listing and lookup"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDocV1;

/// Serves the generated OpenAPI document at `/api-docs/openapi.json`
pub fn openapi_routes() -> Router<AppState> {
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDocV1::openapi()) }),
    )
}
