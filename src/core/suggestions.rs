//! Correction hints for failed rows.
//!
//! Given a failed row's raw values and the error that rejected it, this
//! module queries the current reference data and proposes concrete fixes: the
//! list of valid codes when a business key does not exist, the nearest
//! permitted unit count when the requested one is out of range, formatting
//! guidance for malformed cells. Suggestion generation never fails; if a
//! lookup errors out the row just gets a generic "verify inputs" hint.

use crate::{
    core::resolver,
    entities::{Category, RateType, RentalLocation, Season, SeasonColumn},
    errors::{Error, Result},
    import::RowRecord,
};
use sea_orm::{ConnectionTrait, prelude::*};

/// Produces correction hints for one failed row. Infallible by contract.
pub async fn suggest_corrections<C: ConnectionTrait>(
    conn: &C,
    record: &RowRecord,
    error: &Error,
) -> Vec<String> {
    match corrections(conn, record, error).await {
        Ok(suggestions) if !suggestions.is_empty() => suggestions,
        Ok(_) => vec![GENERIC_HINT.to_string()],
        Err(lookup_error) => {
            tracing::debug!(line = record.line, %lookup_error, "Suggestion lookup failed");
            vec![GENERIC_HINT.to_string()]
        }
    }
}

const GENERIC_HINT: &str = "verify the row values against the current catalog";

async fn corrections<C: ConnectionTrait>(
    conn: &C,
    record: &RowRecord,
    error: &Error,
) -> Result<Vec<String>> {
    match error {
        Error::MissingField { field } => Ok(vec![format!("provide a value for column '{field}'")]),

        Error::InvalidPriceFormat { .. } => Ok(vec![
            "write the price as a plain non-negative number, e.g. 25.50 or 25,50".to_string(),
        ]),

        Error::InvalidUnitsFormat { .. } => {
            Ok(vec!["units must be a positive whole number".to_string()])
        }

        Error::InvalidTimeMeasurement { .. } => Ok(vec![
            "valid time measurements: days, hours, minutes, months (Spanish names accepted)"
                .to_string(),
        ]),

        Error::PriceDefinitionNotFound { .. } => unknown_key_suggestions(conn, record).await,

        Error::InvalidSeason { .. } => season_suggestions(conn, record).await,

        Error::InvalidUnits { units, allowed, .. } => Ok(nearest_units_suggestion(*units, allowed)),

        // File-scoped errors have no per-row correction
        Error::Header { .. }
        | Error::RollbackThreshold { .. }
        | Error::ImportFile { .. }
        | Error::Config { .. }
        | Error::Database(_)
        | Error::Csv(_)
        | Error::Json(_)
        | Error::Io(_) => Ok(vec![]),
    }
}

/// Lists the valid values for whichever legs of the business-key triple do
/// not match current reference data.
async fn unknown_key_suggestions<C: ConnectionTrait>(
    conn: &C,
    record: &RowRecord,
) -> Result<Vec<String>> {
    let mut suggestions = Vec::new();

    let categories = Category::find().all(conn).await?;
    if !categories.iter().any(|c| c.code == record.category_code) {
        let codes: Vec<&str> = categories.iter().map(|c| c.code.as_str()).collect();
        suggestions.push(format!(
            "category '{}' does not exist; valid codes: {}",
            record.category_code,
            codes.join(", ")
        ));
    }

    let locations = RentalLocation::find().all(conn).await?;
    if !locations.iter().any(|l| l.name == record.rental_location_name) {
        let names: Vec<&str> = locations.iter().map(|l| l.name.as_str()).collect();
        suggestions.push(format!(
            "location '{}' does not exist; valid locations: {}",
            record.rental_location_name,
            names.join(", ")
        ));
    }

    let rate_types = RateType::find().all(conn).await?;
    if !rate_types.iter().any(|r| r.name == record.rate_type_name) {
        let names: Vec<&str> = rate_types.iter().map(|r| r.name.as_str()).collect();
        suggestions.push(format!(
            "rate type '{}' does not exist; valid rate types: {}",
            record.rate_type_name,
            names.join(", ")
        ));
    }

    if suggestions.is_empty() {
        suggestions.push(
            "the category, location, and rate type all exist but are not linked as a combination"
                .to_string(),
        );
    }
    Ok(suggestions)
}

/// Lists the seasons valid for the row's resolved definition, or tells the
/// user to drop the season for non-seasonal definitions.
async fn season_suggestions<C: ConnectionTrait>(
    conn: &C,
    record: &RowRecord,
) -> Result<Vec<String>> {
    let definition = resolver::resolve_price_definition(
        conn,
        &record.category_code,
        &record.rental_location_name,
        &record.rate_type_name,
    )
    .await?;

    if !definition.is_seasonal() {
        return Ok(vec![
            "this combination is not seasonal; leave season_name empty".to_string(),
        ]);
    }

    let Some(season_definition_id) = definition.season_definition_id else {
        return Ok(vec![]);
    };
    let seasons = Season::find()
        .filter(SeasonColumn::SeasonDefinitionId.eq(season_definition_id))
        .all(conn)
        .await?;
    let names: Vec<&str> = seasons.iter().map(|s| s.name.as_str()).collect();
    Ok(vec![format!(
        "valid seasons for this combination: {}",
        names.join(", ")
    )])
}

/// Proposes the permitted unit count nearest to the rejected one by absolute
/// distance, alongside the full valid list.
fn nearest_units_suggestion(units: i32, allowed: &str) -> Vec<String> {
    let values: Vec<i32> = allowed
        .split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect();
    let Some(nearest) = values.iter().copied().min_by_key(|v| (v - units).abs()) else {
        return vec!["no unit counts are configured for this time measurement".to_string()];
    };
    vec![format!(
        "units {units} is not allowed; nearest valid value is {nearest} (allowed: {allowed})"
    )]
}
