//! Price definition entity - The pricing policy behind a catalog link.
//!
//! A definition is either seasonal (`definition_type == 1`, carries a
//! `season_definition_id` and every price row must name a season from it) or
//! non-seasonal (`definition_type == 2`, no season definition and no row may
//! carry a season). The three `units_*` columns hold comma-separated
//! ascending lists of permitted unit counts (e.g. `"1,2,4,15"`); months has
//! no list because the only permitted month count is 1.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `definition_type` value for seasonal definitions
pub const TYPE_SEASONAL: i32 = 1;
/// `definition_type` value for non-seasonal definitions
pub const TYPE_NON_SEASONAL: i32 = 2;

/// Price definition database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_definitions")]
pub struct Model {
    /// Unique identifier for the price definition
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 1 = seasonal, 2 = non-seasonal
    pub definition_type: i32,
    /// Owning season definition, present iff `definition_type == 1`
    pub season_definition_id: Option<i64>,
    /// Permitted day counts, comma-separated ascending (e.g. `"1,2,4,15"`)
    pub units_days: Option<String>,
    /// Permitted hour counts, comma-separated ascending
    pub units_hours: Option<String>,
    /// Permitted minute counts, comma-separated ascending
    pub units_minutes: Option<String>,
}

impl Model {
    /// Whether this definition requires a season on every price row.
    #[must_use]
    pub const fn is_seasonal(&self) -> bool {
        self.definition_type == TYPE_SEASONAL
    }
}

/// Defines relationships between `PriceDefinition` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One definition backs many catalog links
    #[sea_orm(has_many = "super::catalog_link::Entity")]
    CatalogLinks,
    /// One definition owns many price rows
    #[sea_orm(has_many = "super::price::Entity")]
    Prices,
    /// A seasonal definition points at one season definition
    #[sea_orm(
        belongs_to = "super::season_definition::Entity",
        from = "Column::SeasonDefinitionId",
        to = "super::season_definition::Column::Id"
    )]
    SeasonDefinition,
}

impl Related<super::catalog_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CatalogLinks.def()
    }
}

impl Related<super::price::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prices.def()
    }
}

impl Related<super::season_definition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SeasonDefinition.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
