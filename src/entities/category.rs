use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category entity: a taxonomy node that other records are tagged with
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Classification tag, stored in the `type` column
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub category_type: String,
    pub is_hot: bool,
    pub status: CategoryStatus,
    /// Manual rank, stored in the `order` column
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::categoryable::Entity")]
    Categoryables,
}

impl Related<super::categoryable::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categoryables.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Publication state, stored as an integer where `1` means published
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum CategoryStatus {
    #[default]
    #[sea_orm(num_value = 0)]
    Unpublished,
    #[sea_orm(num_value = 1)]
    Published,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_unpublished() {
        let status = CategoryStatus::default();
        assert_eq!(status, CategoryStatus::Unpublished);
        assert_eq!(status.to_value(), 0);
        assert_eq!(CategoryStatus::Published.to_value(), 1);
    }
}
