//! Season definition entity - A named grouping of seasons.
//!
//! A seasonal price definition points at exactly one season definition, and
//! rows for that definition may only use seasons belonging to it. Season
//! names are unique only within their definition.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Season definition database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "season_definitions")]
pub struct Model {
    /// Unique identifier for the season definition
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name of the grouping
    pub name: String,
}

/// Defines relationships between `SeasonDefinition` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One season definition owns many seasons
    #[sea_orm(has_many = "super::season::Entity")]
    Seasons,
}

impl Related<super::season::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seasons.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
