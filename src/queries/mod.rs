//! Query scopes for categories and the declarative filter built on top of them.

pub mod category_filter;
pub mod category_scopes;

pub use category_filter::{CategoryFilter, CategorySort};
pub use category_scopes::{CategoryScopes, CategoryWithUsage, SortDirection, USAGE_COUNT_ALIAS};
