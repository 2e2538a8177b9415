//! Category entity - Represents a rental vehicle category.
//!
//! Categories are reference data identified by a short unique `code`
//! (e.g. "A", "B1") with a human-readable name. They are created
//! out-of-band and only read by the import pipeline.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short unique business code (e.g. "A", "B1")
    #[sea_orm(unique)]
    pub code: String,
    /// Human-readable category name
    pub name: String,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category participates in many catalog links
    #[sea_orm(has_many = "super::catalog_link::Entity")]
    CatalogLinks,
}

impl Related<super::catalog_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CatalogLinks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
