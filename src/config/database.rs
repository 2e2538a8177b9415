//! Database configuration module.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Table
//! creation uses `Schema::create_table_from_entity` so the database schema is
//! generated from the entity definitions without hand-written SQL.

use crate::entities::{
    CatalogLink, Category, Price, PriceDefinition, RateType, RentalLocation, Season,
    SeasonDefinition,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the `DATABASE_URL` environment variable,
/// falling back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/tarifa.sqlite".to_string())
}

/// Establishes a connection to the database using [`get_database_url`].
///
/// # Errors
/// Returns an error if the connection cannot be established.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all catalog tables from the entity definitions.
///
/// Statements use `IF NOT EXISTS`, so this is safe to call on every startup.
/// Existing tables are not migrated.
///
/// # Errors
/// Returns an error if any CREATE TABLE statement fails.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = [
        schema.create_table_from_entity(Category),
        schema.create_table_from_entity(RentalLocation),
        schema.create_table_from_entity(RateType),
        schema.create_table_from_entity(SeasonDefinition),
        schema.create_table_from_entity(Season),
        schema.create_table_from_entity(PriceDefinition),
        schema.create_table_from_entity(CatalogLink),
        schema.create_table_from_entity(Price),
    ];
    for statement in &mut statements {
        db.execute(builder.build(statement.if_not_exists())).await?;
    }

    Ok(())
}
