//! Rental location entity - Represents an office where vehicles are rented.
//!
//! Locations are reference data identified by a unique name, created
//! out-of-band and only read by the import pipeline.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Rental location database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rental_locations")]
pub struct Model {
    /// Unique identifier for the location
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique location name (e.g. "Barcelona")
    #[sea_orm(unique)]
    pub name: String,
}

/// Defines relationships between `RentalLocation` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One location participates in many catalog links
    #[sea_orm(has_many = "super::catalog_link::Entity")]
    CatalogLinks,
}

impl Related<super::catalog_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CatalogLinks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
