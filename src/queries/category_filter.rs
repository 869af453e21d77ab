use sea_orm::Select;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::category_scopes::{CategoryScopes, SortDirection};
use crate::entities::category;

/// Sort keys a caller can ask for
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CategorySort {
    Order,
    Name,
    MostUsed,
    LeastUsed,
}

impl CategorySort {
    pub fn is_usage(self) -> bool {
        matches!(self, Self::MostUsed | Self::LeastUsed)
    }
}

/// Declarative combination of the category scopes.
///
/// Predicates are applied in a fixed order (type, hot, published) followed by
/// the optional sort. An empty filter leaves the query untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryFilter {
    /// Only categories of this type
    #[serde(rename = "type", default)]
    #[validate(length(min = 1, max = 100))]
    pub category_type: Option<String>,

    /// Only hot categories
    #[serde(default)]
    pub hot: bool,

    /// Only published categories
    #[serde(default)]
    pub published: bool,

    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub sort: Option<CategorySort>,

    /// Direction for `order` and `name` sorts; defaults to `asc`
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub direction: Option<SortDirection>,

    /// Discriminator used when counting usage
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub categoryable_type: Option<String>,
}

impl CategoryFilter {
    pub fn of_type(mut self, category_type: impl Into<String>) -> Self {
        self.category_type = Some(category_type.into());
        self
    }

    pub fn hot(mut self) -> Self {
        self.hot = true;
        self
    }

    pub fn published(mut self) -> Self {
        self.published = true;
        self
    }

    pub fn sorted(mut self, sort: CategorySort, direction: Option<SortDirection>) -> Self {
        self.sort = Some(sort);
        self.direction = direction;
        self
    }

    pub fn counting(mut self, categoryable_type: impl Into<String>) -> Self {
        self.categoryable_type = Some(categoryable_type.into());
        self
    }

    /// True when the sort already projects the usage count column
    pub fn sorts_by_usage(&self) -> bool {
        self.sort.map(CategorySort::is_usage).unwrap_or(false)
    }

    pub fn apply(&self, mut query: Select<category::Entity>) -> Select<category::Entity> {
        if let Some(category_type) = &self.category_type {
            query = query.of_type(category_type.as_str());
        }
        if self.hot {
            query = query.is_hot();
        }
        if self.published {
            query = query.is_published();
        }

        let direction = self.direction.unwrap_or_default();
        let categoryable_type = self.categoryable_type.as_deref();
        match self.sort {
            Some(CategorySort::Order) => query.sort_by_order(direction),
            Some(CategorySort::Name) => query.sort_by_name(direction),
            Some(CategorySort::MostUsed) => query.most_used(categoryable_type),
            Some(CategorySort::LeastUsed) => query.least_used(categoryable_type),
            None => query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::category::Entity as Category;
    use sea_orm::{DbBackend, EntityTrait, QueryTrait};

    fn sql(filter: &CategoryFilter) -> String {
        filter
            .apply(Category::find())
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn empty_filter_leaves_query_untouched() {
        let plain = Category::find().build(DbBackend::Sqlite).to_string();
        assert_eq!(sql(&CategoryFilter::default()), plain);
    }

    #[test]
    fn chained_filter_composes_predicates_then_sort() {
        let filter = CategoryFilter::default()
            .of_type("news")
            .published()
            .sorted(CategorySort::Name, Some(SortDirection::Asc));

        let query = sql(&filter);
        assert!(query.contains(r#""categories"."type" = 'news' AND "categories"."status" = 1"#));
        assert!(query.ends_with(r#"ORDER BY "categories"."name" ASC"#));
        assert!(!filter.sorts_by_usage());
    }

    #[test]
    fn usage_sort_uses_discriminator() {
        let filter = CategoryFilter::default()
            .sorted(CategorySort::LeastUsed, Some(SortDirection::Desc))
            .counting("page");

        let query = sql(&filter);
        assert!(query.contains(r#""categoryables"."categoryable_type" = 'page'"#));
        // direction only applies to column sorts
        assert!(query.ends_with(r#"ORDER BY "categoryables_count" ASC, "categories"."id" ASC"#));
        assert!(filter.sorts_by_usage());
    }

    #[test]
    fn deserializes_from_query_string_shape() {
        let filter: CategoryFilter = serde_json::from_value(serde_json::json!({
            "type": "news",
            "hot": true,
            "sort": "most_used",
            "direction": "DESC",
            "categoryable_type": "post"
        }))
        .unwrap();

        assert_eq!(filter.category_type.as_deref(), Some("news"));
        assert!(filter.hot);
        assert!(!filter.published);
        assert_eq!(filter.sort, Some(CategorySort::MostUsed));
        assert_eq!(filter.direction, Some(SortDirection::Desc));
    }

    #[test]
    fn rejects_misspelled_direction() {
        let result: Result<CategoryFilter, _> =
            serde_json::from_value(serde_json::json!({ "sort": "order", "direction": "acs" }));
        assert!(result.is_err());
    }

    #[test]
    fn validation_rejects_empty_type() {
        let filter = CategoryFilter::default().of_type("");
        assert!(filter.validate().is_err());
        assert!(CategoryFilter::default().of_type("news").validate().is_ok());
    }
}
