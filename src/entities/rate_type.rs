//! Rate type entity - Represents a commercial rate (e.g. "Estándar", "Premium").
//!
//! Rate types are reference data identified by a unique name, created
//! out-of-band and only read by the import pipeline.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Rate type database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rate_types")]
pub struct Model {
    /// Unique identifier for the rate type
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique rate type name
    #[sea_orm(unique)]
    pub name: String,
}

/// Defines relationships between `RateType` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One rate type participates in many catalog links
    #[sea_orm(has_many = "super::catalog_link::Entity")]
    CatalogLinks,
}

impl Related<super::catalog_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CatalogLinks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
