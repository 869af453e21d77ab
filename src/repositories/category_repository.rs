use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::entities::category::{
    self, ActiveModel as CategoryActiveModel, CategoryStatus, Entity as Category,
    Model as CategoryModel,
};
use crate::entities::categoryable::{self, Entity as Categoryable};
use crate::errors::ServiceError;
use crate::queries::{CategoryFilter, CategoryScopes, CategoryWithUsage};
use crate::repositories::Repository;

use super::BaseRepository;

/// Input for creating a category
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCategory {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category_type: String,
    #[serde(default)]
    pub is_hot: bool,
    #[serde(default)]
    pub status: CategoryStatus,
    #[serde(default)]
    pub order: i32,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, category_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            category_type: category_type.into(),
            is_hot: false,
            status: CategoryStatus::Unpublished,
            order: 0,
        }
    }

    pub fn hot(mut self) -> Self {
        self.is_hot = true;
        self
    }

    pub fn published(mut self) -> Self {
        self.status = CategoryStatus::Published;
        self
    }

    pub fn ranked(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

/// Zero-based page index for `page`, rejecting pages whose row offset the
/// database cannot bind (offsets are signed 64-bit).
fn page_index(page: u64, per_page: u64) -> Result<u64, ServiceError> {
    let index = page.max(1) - 1;
    match index.checked_mul(per_page) {
        Some(offset) if offset <= i64::MAX as u64 => Ok(index),
        _ => Err(ServiceError::InvalidInput(format!(
            "page {} is out of range",
            page
        ))),
    }
}

/// Repository for categories and their categoryable links
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find a category by ID
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Option<CategoryModel>, ServiceError> {
        Ok(Category::find_by_id(id).one(self.get_db()).await?)
    }

    /// Find a category by ID, failing with `NotFound` when missing
    pub async fn get(&self, id: i32) -> Result<CategoryModel, ServiceError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {} not found", id)))
    }

    /// List categories matching the filter, one page at a time.
    ///
    /// `page` is 1-based; the total counts the filtered set.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: &CategoryFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<CategoryModel>, u64), ServiceError> {
        let per_page = per_page.max(1);
        let index = page_index(page, per_page)?;

        let mut query = filter.apply(Category::find());
        if !filter.sorts_by_usage() {
            query = query.order_by_asc(category::Column::Id);
        }

        let paginator = query.paginate(self.get_db(), per_page);
        let total = paginator.num_items().await?;
        let categories = paginator.fetch_page(index).await?;

        debug!(total, returned = categories.len(), "Listed categories");
        Ok((categories, total))
    }

    /// List categories matching the filter together with their usage counts,
    /// paged the same way as [`list`](Self::list)
    #[instrument(skip(self))]
    pub async fn list_with_usage(
        &self,
        filter: &CategoryFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<CategoryWithUsage>, u64), ServiceError> {
        let per_page = per_page.max(1);
        let index = page_index(page, per_page)?;

        let mut query = filter.apply(Category::find());
        if !filter.sorts_by_usage() {
            query = query
                .with_usage_count(filter.categoryable_type.as_deref())
                .order_by_asc(category::Column::Id);
        }

        let paginator = query
            .into_model::<CategoryWithUsage>()
            .paginate(self.get_db(), per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(index).await?;

        debug!(total, returned = rows.len(), "Listed category usage");
        Ok((rows, total))
    }

    /// Count the links of one category, optionally restricted to a discriminator
    #[instrument(skip(self))]
    pub async fn usage_count(
        &self,
        category_id: i32,
        categoryable_type: Option<&str>,
    ) -> Result<u64, ServiceError> {
        let mut query =
            Categoryable::find().filter(categoryable::Column::CategoryId.eq(category_id));
        if let Some(kind) = categoryable_type {
            query = query.filter(categoryable::Column::CategoryableType.eq(kind));
        }

        Ok(query.count(self.get_db()).await?)
    }

    /// Create a new category
    #[instrument(skip(self), fields(name = %input.name))]
    pub async fn create(&self, input: NewCategory) -> Result<CategoryModel, ServiceError> {
        input.validate()?;

        let now = Utc::now();
        let category = CategoryActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            category_type: Set(input.category_type),
            is_hot: Set(input.is_hot),
            status: Set(input.status),
            order: Set(input.order),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let category = category.insert(self.get_db()).await?;
        info!("Created category: {}", category.id);
        Ok(category)
    }

    /// Tag a categorizable record with a category.
    ///
    /// Attaching an existing link returns it unchanged.
    #[instrument(skip(self))]
    pub async fn attach(
        &self,
        category_id: i32,
        categoryable_type: &str,
        categoryable_id: i32,
    ) -> Result<categoryable::Model, ServiceError> {
        if categoryable_type.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "categoryable_type cannot be blank".to_string(),
            ));
        }
        self.get(category_id).await?;

        let existing = Categoryable::find()
            .filter(categoryable::Column::CategoryId.eq(category_id))
            .filter(categoryable::Column::CategoryableType.eq(categoryable_type))
            .filter(categoryable::Column::CategoryableId.eq(categoryable_id))
            .one(self.get_db())
            .await?;
        if let Some(link) = existing {
            debug!("Categoryable already attached: {}", link.id);
            return Ok(link);
        }

        let link = categoryable::ActiveModel {
            category_id: Set(category_id),
            categoryable_id: Set(categoryable_id),
            categoryable_type: Set(categoryable_type.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        Ok(link.insert(self.get_db()).await?)
    }

    /// Remove a categorizable record from a category; returns the number of links removed
    #[instrument(skip(self))]
    pub async fn detach(
        &self,
        category_id: i32,
        categoryable_type: &str,
        categoryable_id: i32,
    ) -> Result<u64, ServiceError> {
        let result = Categoryable::delete_many()
            .filter(categoryable::Column::CategoryId.eq(category_id))
            .filter(categoryable::Column::CategoryableType.eq(categoryable_type))
            .filter(categoryable::Column::CategoryableId.eq(categoryable_id))
            .exec(self.get_db())
            .await?;

        Ok(result.rows_affected)
    }

    /// Delete a category and its links
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let category = self.get(id).await?;

        let txn = self.get_db().begin().await?;
        Categoryable::delete_many()
            .filter(categoryable::Column::CategoryId.eq(category.id))
            .exec(&txn)
            .await?;
        Category::delete_by_id(category.id).exec(&txn).await?;
        txn.commit().await?;

        info!("Deleted category: {}", id);
        Ok(())
    }
}

impl Repository for CategoryRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
