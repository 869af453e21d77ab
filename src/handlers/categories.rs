use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use sea_orm::ActiveEnum;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    entities::category::{self, CategoryStatus},
    errors::ApiError,
    handlers::common::{
        map_path_rejection, map_query_rejection, map_service_error, success_response,
        validate_input, PaginatedResponse, PaginationParams,
    },
    queries::{CategoryFilter, CategoryWithUsage},
    AppState,
};

/// Category as returned by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub category_type: String,
    pub is_hot: bool,
    /// Raw status value, `1` when published
    pub status: i32,
    pub published: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<category::Model> for CategoryResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            category_type: model.category_type,
            is_hot: model.is_hot,
            status: model.status.to_value(),
            published: model.status == CategoryStatus::Published,
            order: model.order,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Category together with how many records it is attached to
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryUsageResponse {
    #[serde(flatten)]
    pub category: CategoryResponse,
    pub categoryables_count: i64,
}

impl From<CategoryWithUsage> for CategoryUsageResponse {
    fn from(row: CategoryWithUsage) -> Self {
        Self {
            category: row.category.into(),
            categoryables_count: row.categoryables_count,
        }
    }
}

/// Paginated list of categories
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryPage {
    pub data: Vec<CategoryResponse>,
    pub pagination: crate::handlers::common::PaginationMeta,
}

/// Paginated list of categories with usage counts
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryUsagePage {
    pub data: Vec<CategoryUsageResponse>,
    pub pagination: crate::handlers::common::PaginationMeta,
}

/// Creates the router for category endpoints
pub fn categories_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories))
        .route("/usage", get(list_category_usage))
        .route("/:id", get(get_category))
}

/// List categories, filtered and sorted by the category scopes
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    params(CategoryFilter, PaginationParams),
    responses(
        (status = 200, description = "Categories listed", body = CategoryPage),
        (status = 400, description = "Invalid query parameters or page out of range", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    filter: Result<Query<CategoryFilter>, QueryRejection>,
    pagination: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(filter) = filter.map_err(map_query_rejection)?;
    let Query(pagination) = pagination.map_err(map_query_rejection)?;
    validate_input(&filter)?;

    let page = pagination.page();
    let per_page = state.config.clamp_page_size(pagination.per_page);

    let (categories, total) = state
        .categories
        .list(&filter, page, per_page)
        .await
        .map_err(map_service_error)?;

    let data = categories.into_iter().map(CategoryResponse::from).collect();
    Ok(success_response(PaginatedResponse::new(
        data, page, per_page, total,
    )))
}

/// List categories with their usage counts
#[utoipa::path(
    get,
    path = "/api/v1/categories/usage",
    params(CategoryFilter, PaginationParams),
    responses(
        (status = 200, description = "Categories with usage counts", body = CategoryUsagePage),
        (status = 400, description = "Invalid query parameters or page out of range", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn list_category_usage(
    State(state): State<AppState>,
    filter: Result<Query<CategoryFilter>, QueryRejection>,
    pagination: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(filter) = filter.map_err(map_query_rejection)?;
    let Query(pagination) = pagination.map_err(map_query_rejection)?;
    validate_input(&filter)?;

    let page = pagination.page();
    let per_page = state.config.clamp_page_size(pagination.per_page);

    let (rows, total) = state
        .categories
        .list_with_usage(&filter, page, per_page)
        .await
        .map_err(map_service_error)?;

    let data = rows.into_iter().map(CategoryUsageResponse::from).collect();
    Ok(success_response(PaginatedResponse::new(
        data, page, per_page, total,
    )))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 400, description = "Malformed ID", body = crate::errors::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id.map_err(map_path_rejection)?;

    let category = state
        .categories
        .get(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(CategoryResponse::from(category)))
}
