//! Price create-or-update by natural key.
//!
//! The natural key of a price row is (price definition, season, time
//! measurement, units). A NULL season is a key value of its own: a
//! non-seasonal tariff never collides with a seasonal one for the same
//! definition/measurement/units.

use crate::{
    entities::{Price, PriceColumn, price},
    errors::Result,
    import::TimeMeasurement,
};
use sea_orm::{ConnectionTrait, IntoActiveModel, Set, prelude::*};
use serde::Serialize;

/// Whether the upsert created a new row or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    /// No row matched the natural key; one was inserted
    Created,
    /// A row matched the natural key; its price fields were replaced
    Updated,
}

/// Outcome of one upsert call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpsertResult {
    /// What happened to the row
    pub action: UpsertAction,
    /// ID of the created or updated price row
    pub price_id: i64,
}

/// Creates or updates the price row for the given natural key.
///
/// On update, `included_km` and `extra_km_price` are reset to their
/// defaults rather than carried over from the row data; the pipeline does
/// not currently propagate the optional km columns into this call.
///
/// # Errors
/// Returns a database error if the lookup or write fails.
pub async fn upsert_price<C: ConnectionTrait>(
    conn: &C,
    price_definition_id: i64,
    season_id: Option<i64>,
    time_measurement: TimeMeasurement,
    units: i32,
    price_value: f64,
) -> Result<UpsertResult> {
    let mut query = Price::find()
        .filter(PriceColumn::PriceDefinitionId.eq(price_definition_id))
        .filter(PriceColumn::TimeMeasurement.eq(time_measurement.as_str()))
        .filter(PriceColumn::Units.eq(units));
    query = match season_id {
        Some(id) => query.filter(PriceColumn::SeasonId.eq(id)),
        None => query.filter(PriceColumn::SeasonId.is_null()),
    };

    if let Some(existing) = query.one(conn).await? {
        let price_id = existing.id;
        let mut active = existing.into_active_model();
        active.price = Set(price_value);
        active.included_km = Set(0);
        active.extra_km_price = Set(0.0);
        active.update(conn).await?;

        tracing::debug!(price_id, units, "Updated existing price row");
        return Ok(UpsertResult {
            action: UpsertAction::Updated,
            price_id,
        });
    }

    let created = price::ActiveModel {
        price_definition_id: Set(price_definition_id),
        season_id: Set(season_id),
        time_measurement: Set(time_measurement.as_str().to_string()),
        units: Set(units),
        price: Set(price_value),
        included_km: Set(0),
        extra_km_price: Set(0.0),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    tracing::debug!(price_id = created.id, units, "Created price row");
    Ok(UpsertResult {
        action: UpsertAction::Created,
        price_id: created.id,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::resolver::resolve_price_definition;
    use crate::test_utils::{seed_test_catalog, setup_test_db};

    #[tokio::test]
    async fn test_create_then_update() -> Result<()> {
        let db = setup_test_db().await?;
        seed_test_catalog(&db).await?;
        let definition = resolve_price_definition(&db, "B", "Barcelona", "Estándar").await?;

        let first =
            upsert_price(&db, definition.id, None, TimeMeasurement::Days, 7, 120.0).await?;
        assert_eq!(first.action, UpsertAction::Created);

        let second =
            upsert_price(&db, definition.id, None, TimeMeasurement::Days, 7, 99.0).await?;
        assert_eq!(second.action, UpsertAction::Updated);
        assert_eq!(second.price_id, first.price_id);

        let rows = Price::find().all(&db).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].price, 99.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_resets_km_fields() -> Result<()> {
        let db = setup_test_db().await?;
        seed_test_catalog(&db).await?;
        let definition = resolve_price_definition(&db, "B", "Barcelona", "Estándar").await?;

        let result =
            upsert_price(&db, definition.id, None, TimeMeasurement::Days, 1, 40.0).await?;

        // Simulate km fields maintained out-of-band
        let mut active = Price::find_by_id(result.price_id)
            .one(&db)
            .await?
            .unwrap()
            .into_active_model();
        active.included_km = Set(100);
        active.extra_km_price = Set(0.25);
        active.update(&db).await?;

        // A re-import of the same key wipes them back to the defaults
        upsert_price(&db, definition.id, None, TimeMeasurement::Days, 1, 45.0).await?;
        let row = Price::find_by_id(result.price_id).one(&db).await?.unwrap();
        assert_eq!(row.included_km, 0);
        assert_eq!(row.extra_km_price, 0.0);
        assert_eq!(row.price, 45.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_null_season_distinct_from_concrete_season() -> Result<()> {
        let db = setup_test_db().await?;
        seed_test_catalog(&db).await?;
        let seasonal = resolve_price_definition(&db, "A", "Barcelona", "Estándar").await?;
        let season_id =
            crate::core::resolver::validate_season_compatibility(&db, &seasonal, "Alta").await?;

        let with_season =
            upsert_price(&db, seasonal.id, season_id, TimeMeasurement::Days, 2, 25.5).await?;
        let without_season =
            upsert_price(&db, seasonal.id, None, TimeMeasurement::Days, 2, 19.0).await?;

        assert_eq!(with_season.action, UpsertAction::Created);
        assert_eq!(without_season.action, UpsertAction::Created);
        assert_ne!(with_season.price_id, without_season.price_id);
        Ok(())
    }

    #[tokio::test]
    async fn test_distinct_measurements_create_distinct_rows() -> Result<()> {
        let db = setup_test_db().await?;
        seed_test_catalog(&db).await?;
        let definition = resolve_price_definition(&db, "B", "Barcelona", "Estándar").await?;

        let days = upsert_price(&db, definition.id, None, TimeMeasurement::Days, 1, 40.0).await?;
        let hours =
            upsert_price(&db, definition.id, None, TimeMeasurement::Hours, 1, 8.0).await?;
        assert_ne!(days.price_id, hours.price_id);
        Ok(())
    }
}
