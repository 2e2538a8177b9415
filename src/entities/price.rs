//! Price entity - A concrete tariff line.
//!
//! One row per (price definition, season, time measurement, units) natural
//! key. `season_id` is NULL for non-seasonal definitions and NULL is a
//! distinct key value, never a wildcard. Price rows are the only table the
//! import pipeline writes, and it never deletes them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Price database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "prices")]
pub struct Model {
    /// Unique identifier for the price row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning price definition
    pub price_definition_id: i64,
    /// Season this tariff applies to, NULL for non-seasonal definitions
    pub season_id: Option<i64>,
    /// Canonical time measurement: `days`, `hours`, `minutes`, or `months`
    pub time_measurement: String,
    /// Number of time units this tariff covers
    pub units: i32,
    /// Tariff price, non-negative
    pub price: f64,
    /// Kilometers included in the tariff
    pub included_km: i32,
    /// Price per kilometer beyond `included_km`
    pub extra_km_price: f64,
}

/// Defines relationships between Price and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each price belongs to one price definition
    #[sea_orm(
        belongs_to = "super::price_definition::Entity",
        from = "Column::PriceDefinitionId",
        to = "super::price_definition::Column::Id"
    )]
    PriceDefinition,
    /// A seasonal price points at one season
    #[sea_orm(
        belongs_to = "super::season::Entity",
        from = "Column::SeasonId",
        to = "super::season::Column::Id"
    )]
    Season,
}

impl Related<super::price_definition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceDefinition.def()
    }
}

impl Related<super::season::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Season.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
