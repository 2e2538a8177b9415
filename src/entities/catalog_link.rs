//! Catalog link entity - Joins a (category, location, rate type) triple to
//! its price definition.
//!
//! The triple is unique: each valid combination points at exactly one
//! definition. This is the lookup table behind business-key resolution.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog link database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category_rental_location_rate_types")]
pub struct Model {
    /// Unique identifier for the link
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Linked category
    pub category_id: i64,
    /// Linked rental location
    pub rental_location_id: i64,
    /// Linked rate type
    pub rate_type_id: i64,
    /// The price definition governing this combination
    pub price_definition_id: i64,
}

/// Defines relationships between the catalog link and its endpoints
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each link belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// Each link belongs to one rental location
    #[sea_orm(
        belongs_to = "super::rental_location::Entity",
        from = "Column::RentalLocationId",
        to = "super::rental_location::Column::Id"
    )]
    RentalLocation,
    /// Each link belongs to one rate type
    #[sea_orm(
        belongs_to = "super::rate_type::Entity",
        from = "Column::RateTypeId",
        to = "super::rate_type::Column::Id"
    )]
    RateType,
    /// Each link points at one price definition
    #[sea_orm(
        belongs_to = "super::price_definition::Entity",
        from = "Column::PriceDefinitionId",
        to = "super::price_definition::Column::Id"
    )]
    PriceDefinition,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::rental_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RentalLocation.def()
    }
}

impl Related<super::rate_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RateType.def()
    }
}

impl Related<super::price_definition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceDefinition.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
