//! Season entity - A named season inside one season definition.
//!
//! A season's name (e.g. "Alta", "Baja") is unique only within its owning
//! definition; two definitions may both contain an "Alta".

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Season database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "seasons")]
pub struct Model {
    /// Unique identifier for the season
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Season name, unique within its definition only
    pub name: String,
    /// ID of the owning season definition
    pub season_definition_id: i64,
}

/// Defines relationships between Season and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each season belongs to one season definition
    #[sea_orm(
        belongs_to = "super::season_definition::Entity",
        from = "Column::SeasonDefinitionId",
        to = "super::season_definition::Column::Id"
    )]
    SeasonDefinition,
}

impl Related<super::season_definition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SeasonDefinition.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
