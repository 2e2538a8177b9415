//! Shared test utilities.
//!
//! Helpers for setting up an in-memory database, seeding a small reference
//! catalog, and writing CSV fixtures. The standard catalog covers both
//! seasonality types:
//!
//! - category `A` / Barcelona / Estándar → seasonal definition over the
//!   "Standard" seasons (Alta, Baja), days `1,2,4,15`, hours `1,2,4,8`,
//!   minutes `30,60`
//! - category `B` / Barcelona / Estándar → non-seasonal definition,
//!   days `1,7,30`, hours `1,2`, no minutes list
//!
//! Madrid exists as a location but is linked to nothing, and the "Winter"
//! season definition (Invierno) belongs to no price definition, so tests can
//! exercise unlinked keys and cross-definition seasons.

use crate::{
    config::{catalog, database},
    errors::{Error, Result},
    import::RowRecord,
};
use sea_orm::DatabaseConnection;
use std::path::PathBuf;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    database::create_tables(&db).await?;
    Ok(db)
}

const TEST_CATALOG: &str = r#"
    [[categories]]
    code = "A"
    name = "Compact"

    [[categories]]
    code = "B"
    name = "Van"

    [[rental_locations]]
    name = "Barcelona"

    [[rental_locations]]
    name = "Madrid"

    [[rate_types]]
    name = "Estándar"

    [[season_definitions]]
    name = "Standard"
    seasons = ["Alta", "Baja"]

    [[season_definitions]]
    name = "Winter"
    seasons = ["Invierno"]

    [[price_definitions]]
    category_code = "A"
    rental_location = "Barcelona"
    rate_type = "Estándar"
    definition_type = 1
    season_definition = "Standard"
    units_days = "1,2,4,15"
    units_hours = "1,2,4,8"
    units_minutes = "30,60"

    [[price_definitions]]
    category_code = "B"
    rental_location = "Barcelona"
    rate_type = "Estándar"
    definition_type = 2
    units_days = "1,7,30"
    units_hours = "1,2"
"#;

/// Seeds the standard test catalog described in the module docs.
pub async fn seed_test_catalog(db: &DatabaseConnection) -> Result<()> {
    let config: catalog::CatalogConfig =
        toml::from_str(TEST_CATALOG).map_err(|e| Error::Config {
            message: format!("test catalog is invalid: {e}"),
        })?;
    catalog::seed_catalog(db, &config).await
}

/// A well-formed row matching the seasonal test definition.
#[must_use]
pub fn sample_row() -> RowRecord {
    RowRecord {
        line: 2,
        category_code: "A".to_string(),
        rental_location_name: "Barcelona".to_string(),
        rate_type_name: "Estándar".to_string(),
        season_name: "Alta".to_string(),
        time_measurement: "days".to_string(),
        units: "2".to_string(),
        price: "25.50".to_string(),
        included_km: String::new(),
        extra_km_price: String::new(),
    }
}

/// Writes a CSV fixture into the given temp directory and returns its path.
#[must_use]
pub fn write_csv(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    #[allow(clippy::unwrap_used)]
    std::fs::write(&path, content).unwrap();
    path
}
