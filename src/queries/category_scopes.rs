use sea_orm::{
    sea_query::{Alias, Expr, Func, IntoColumnRef, Query, SimpleExpr, SubQueryStatement},
    ColumnTrait, DbErr, FromQueryResult, Order, QueryFilter, QueryOrder, QueryResult, QuerySelect,
    Select,
};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::entities::{
    category::{self, CategoryStatus},
    categoryable,
};

/// Alias of the computed usage column added by the usage scopes
pub const USAGE_COUNT_ALIAS: &str = "categoryables_count";

/// Direction of an ordering scope.
///
/// Parsing is case-insensitive and only accepts `asc` and `desc`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reverse(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl TryFrom<String> for SortDirection {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.trim().parse()
    }
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

/// Reusable filter and sort scopes over a category query.
///
/// Every scope consumes the query and hands it back, so scopes chain and
/// nothing touches the database until the caller executes the query.
pub trait CategoryScopes: Sized {
    /// Only categories whose `type` equals `category_type`
    fn of_type(self, category_type: impl Into<String>) -> Self;

    /// Only categories flagged hot
    fn is_hot(self) -> Self;

    /// Only published categories (`status = 1`)
    fn is_published(self) -> Self;

    /// Order by the manual `order` rank
    fn sort_by_order(self, direction: SortDirection) -> Self;

    /// Order by `name`
    fn sort_by_name(self, direction: SortDirection) -> Self;

    /// Adds the `categoryables_count` column, optionally counting only
    /// associations of the given discriminator
    fn with_usage_count(self, categoryable_type: Option<&str>) -> Self;

    /// Highest usage count first, ties broken by id
    fn most_used(self, categoryable_type: Option<&str>) -> Self;

    /// Lowest usage count first, ties broken by id
    fn least_used(self, categoryable_type: Option<&str>) -> Self;
}

impl CategoryScopes for Select<category::Entity> {
    fn of_type(self, category_type: impl Into<String>) -> Self {
        self.filter(category::Column::CategoryType.eq(category_type.into()))
    }

    fn is_hot(self) -> Self {
        self.filter(category::Column::IsHot.eq(true))
    }

    fn is_published(self) -> Self {
        self.filter(category::Column::Status.eq(CategoryStatus::Published))
    }

    fn sort_by_order(self, direction: SortDirection) -> Self {
        self.order_by(category::Column::Order, direction.into())
    }

    fn sort_by_name(self, direction: SortDirection) -> Self {
        self.order_by(category::Column::Name, direction.into())
    }

    fn with_usage_count(self, categoryable_type: Option<&str>) -> Self {
        self.column_as(usage_count_expr(categoryable_type), USAGE_COUNT_ALIAS)
    }

    fn most_used(self, categoryable_type: Option<&str>) -> Self {
        sort_by_usage(self, categoryable_type, SortDirection::Desc)
    }

    fn least_used(self, categoryable_type: Option<&str>) -> Self {
        sort_by_usage(self, categoryable_type, SortDirection::Asc)
    }
}

fn sort_by_usage(
    query: Select<category::Entity>,
    categoryable_type: Option<&str>,
    direction: SortDirection,
) -> Select<category::Entity> {
    query
        .with_usage_count(categoryable_type)
        .order_by(usage_count_column(), direction.into())
        .order_by_asc(category::Column::Id)
}

fn usage_count_column() -> SimpleExpr {
    SimpleExpr::Column(Alias::new(USAGE_COUNT_ALIAS).into_column_ref())
}

/// Correlated sub-select counting the associations of the outer category row
fn usage_count_expr(categoryable_type: Option<&str>) -> SimpleExpr {
    let mut subquery = Query::select();
    subquery
        .expr(Func::count(Expr::col((
            categoryable::Entity,
            categoryable::Column::CategoryId,
        ))))
        .from(categoryable::Entity)
        .and_where(
            Expr::col((categoryable::Entity, categoryable::Column::CategoryId))
                .equals((category::Entity, category::Column::Id)),
        );

    if let Some(kind) = categoryable_type {
        subquery.and_where(
            Expr::col((
                categoryable::Entity,
                categoryable::Column::CategoryableType,
            ))
            .eq(kind),
        );
    }

    SimpleExpr::SubQuery(
        None,
        Box::new(SubQueryStatement::SelectStatement(subquery.to_owned())),
    )
}

/// A category row together with its computed usage count
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryWithUsage {
    #[serde(flatten)]
    pub category: category::Model,
    pub categoryables_count: i64,
}

impl FromQueryResult for CategoryWithUsage {
    fn from_query_result(res: &QueryResult, pre: &str) -> Result<Self, DbErr> {
        Ok(Self {
            category: category::Model::from_query_result(res, pre)?,
            categoryables_count: res.try_get(pre, USAGE_COUNT_ALIAS)?,
        })
    }
}
