//! Reference catalog loading from catalog.toml.
//!
//! The import pipeline never creates reference data; categories, locations,
//! rate types, season definitions and price definitions are maintained
//! out-of-band. This module loads a TOML description of that catalog and
//! seeds it into an empty database so the binary can run end-to-end. Seeding
//! is idempotent: entries that already exist (by business key) are skipped.

use crate::{
    entities::{
        CatalogLink, CatalogLinkColumn, Category, CategoryColumn, PriceDefinition, RateType,
        RateTypeColumn, RentalLocation, RentalLocationColumn, Season, SeasonColumn,
        SeasonDefinition, SeasonDefinitionColumn, catalog_link, category, price_definition,
        rate_type, rental_location, season, season_definition,
    },
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, Set, prelude::*};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire catalog.toml file
#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    /// Vehicle categories to seed
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    /// Rental locations to seed
    #[serde(default)]
    pub rental_locations: Vec<NamedConfig>,
    /// Rate types to seed
    #[serde(default)]
    pub rate_types: Vec<NamedConfig>,
    /// Season definitions (with their seasons) to seed
    #[serde(default)]
    pub season_definitions: Vec<SeasonDefinitionConfig>,
    /// Price definitions and the catalog links pointing at them
    #[serde(default)]
    pub price_definitions: Vec<PriceDefinitionConfig>,
}

/// Configuration for a single category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Short unique business code
    pub code: String,
    /// Human-readable name
    pub name: String,
}

/// Configuration for an entity identified by name only
#[derive(Debug, Deserialize, Clone)]
pub struct NamedConfig {
    /// Unique name
    pub name: String,
}

/// Configuration for a season definition and its seasons
#[derive(Debug, Deserialize, Clone)]
pub struct SeasonDefinitionConfig {
    /// Season definition name
    pub name: String,
    /// Season names owned by this definition
    pub seasons: Vec<String>,
}

/// Configuration for one price definition plus its catalog link
#[derive(Debug, Deserialize, Clone)]
pub struct PriceDefinitionConfig {
    /// Category code of the link
    pub category_code: String,
    /// Rental location name of the link
    pub rental_location: String,
    /// Rate type name of the link
    pub rate_type: String,
    /// 1 = seasonal, 2 = non-seasonal
    pub definition_type: i32,
    /// Season definition name, required when `definition_type == 1`
    pub season_definition: Option<String>,
    /// Permitted day counts, comma-separated ascending
    pub units_days: Option<String>,
    /// Permitted hour counts, comma-separated ascending
    pub units_hours: Option<String>,
    /// Permitted minute counts, comma-separated ascending
    pub units_minutes: Option<String>,
}

/// Loads catalog configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog.toml: {e}"),
    })
}

/// Seeds the reference catalog into the database, skipping entries that
/// already exist by business key.
///
/// # Errors
/// Returns an error on database failure or when a price definition names a
/// category, location, rate type, or season definition that is not part of
/// the catalog.
pub async fn seed_catalog(db: &DatabaseConnection, config: &CatalogConfig) -> Result<()> {
    for cat in &config.categories {
        let existing = Category::find()
            .filter(CategoryColumn::Code.eq(cat.code.as_str()))
            .one(db)
            .await?;
        if existing.is_none() {
            category::ActiveModel {
                code: Set(cat.code.clone()),
                name: Set(cat.name.clone()),
                ..Default::default()
            }
            .insert(db)
            .await?;
            tracing::debug!(code = %cat.code, "Seeded category");
        }
    }

    for loc in &config.rental_locations {
        let existing = RentalLocation::find()
            .filter(RentalLocationColumn::Name.eq(loc.name.as_str()))
            .one(db)
            .await?;
        if existing.is_none() {
            rental_location::ActiveModel {
                name: Set(loc.name.clone()),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }

    for rate in &config.rate_types {
        let existing = RateType::find()
            .filter(RateTypeColumn::Name.eq(rate.name.as_str()))
            .one(db)
            .await?;
        if existing.is_none() {
            rate_type::ActiveModel {
                name: Set(rate.name.clone()),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }

    for def in &config.season_definitions {
        let existing = SeasonDefinition::find()
            .filter(SeasonDefinitionColumn::Name.eq(def.name.as_str()))
            .one(db)
            .await?;
        let definition = match existing {
            Some(model) => model,
            None => {
                season_definition::ActiveModel {
                    name: Set(def.name.clone()),
                    ..Default::default()
                }
                .insert(db)
                .await?
            }
        };

        for season_name in &def.seasons {
            let existing = Season::find()
                .filter(SeasonColumn::SeasonDefinitionId.eq(definition.id))
                .filter(SeasonColumn::Name.eq(season_name.as_str()))
                .one(db)
                .await?;
            if existing.is_none() {
                season::ActiveModel {
                    name: Set(season_name.clone()),
                    season_definition_id: Set(definition.id),
                    ..Default::default()
                }
                .insert(db)
                .await?;
            }
        }
    }

    for def in &config.price_definitions {
        seed_price_definition(db, def).await?;
    }

    tracing::info!(
        categories = config.categories.len(),
        price_definitions = config.price_definitions.len(),
        "Catalog seed complete"
    );
    Ok(())
}

/// Seeds one price definition and its catalog link, resolving the referenced
/// category, location, rate type, and season definition by business key.
async fn seed_price_definition(
    db: &DatabaseConnection,
    def: &PriceDefinitionConfig,
) -> Result<()> {
    let cat = Category::find()
        .filter(CategoryColumn::Code.eq(def.category_code.as_str()))
        .one(db)
        .await?
        .ok_or_else(|| Error::Config {
            message: format!("price definition references unknown category '{}'", def.category_code),
        })?;
    let loc = RentalLocation::find()
        .filter(RentalLocationColumn::Name.eq(def.rental_location.as_str()))
        .one(db)
        .await?
        .ok_or_else(|| Error::Config {
            message: format!("price definition references unknown location '{}'", def.rental_location),
        })?;
    let rate = RateType::find()
        .filter(RateTypeColumn::Name.eq(def.rate_type.as_str()))
        .one(db)
        .await?
        .ok_or_else(|| Error::Config {
            message: format!("price definition references unknown rate type '{}'", def.rate_type),
        })?;

    let existing_link = CatalogLink::find()
        .filter(CatalogLinkColumn::CategoryId.eq(cat.id))
        .filter(CatalogLinkColumn::RentalLocationId.eq(loc.id))
        .filter(CatalogLinkColumn::RateTypeId.eq(rate.id))
        .one(db)
        .await?;
    if existing_link.is_some() {
        return Ok(());
    }

    let season_definition_id = match &def.season_definition {
        Some(name) => Some(
            SeasonDefinition::find()
                .filter(SeasonDefinitionColumn::Name.eq(name.as_str()))
                .one(db)
                .await?
                .ok_or_else(|| Error::Config {
                    message: format!("price definition references unknown season definition '{name}'"),
                })?
                .id,
        ),
        None => None,
    };

    let definition = price_definition::ActiveModel {
        definition_type: Set(def.definition_type),
        season_definition_id: Set(season_definition_id),
        units_days: Set(def.units_days.clone()),
        units_hours: Set(def.units_hours.clone()),
        units_minutes: Set(def.units_minutes.clone()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    catalog_link::ActiveModel {
        category_id: Set(cat.id),
        rental_location_id: Set(loc.id),
        rate_type_id: Set(rate.id),
        price_definition_id: Set(definition.id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(())
}
