//! Business-rule resolution against reference data.
//!
//! Three checks run in order for every row: resolve the price definition
//! behind the (category, location, rate type) business keys, validate that
//! the row's season fits the definition's seasonality, and validate that the
//! requested unit count is one of the definition's enumerated values. Each
//! check fails fast with its own error kind so the report can categorize the
//! failure without inspecting text.
//!
//! All functions are generic over [`ConnectionTrait`] so they can run inside
//! the import transaction as well as against a plain connection (preview).

use crate::{
    entities::{
        CatalogLink, CatalogLinkColumn, Category, CategoryColumn, PriceDefinition, RateType,
        RateTypeColumn, RentalLocation, RentalLocationColumn, Season, SeasonColumn,
        price_definition,
    },
    errors::{Error, Result},
    import::TimeMeasurement,
};
use sea_orm::{ConnectionTrait, prelude::*};

/// Resolves the price definition for a (category code, location name, rate
/// type name) triple by exact string match on the stored values.
///
/// The data model guarantees at most one catalog link per triple.
///
/// # Errors
/// Returns [`Error::PriceDefinitionNotFound`] naming the triple when any leg
/// of the lookup comes up empty, or a database error.
pub async fn resolve_price_definition<C: ConnectionTrait>(
    conn: &C,
    category_code: &str,
    location_name: &str,
    rate_type_name: &str,
) -> Result<price_definition::Model> {
    let not_found = || Error::PriceDefinitionNotFound {
        category_code: category_code.to_string(),
        rental_location: location_name.to_string(),
        rate_type: rate_type_name.to_string(),
    };

    let category = Category::find()
        .filter(CategoryColumn::Code.eq(category_code))
        .one(conn)
        .await?
        .ok_or_else(not_found)?;
    let location = RentalLocation::find()
        .filter(RentalLocationColumn::Name.eq(location_name))
        .one(conn)
        .await?
        .ok_or_else(not_found)?;
    let rate_type = RateType::find()
        .filter(RateTypeColumn::Name.eq(rate_type_name))
        .one(conn)
        .await?
        .ok_or_else(not_found)?;

    let link = CatalogLink::find()
        .filter(CatalogLinkColumn::CategoryId.eq(category.id))
        .filter(CatalogLinkColumn::RentalLocationId.eq(location.id))
        .filter(CatalogLinkColumn::RateTypeId.eq(rate_type.id))
        .one(conn)
        .await?
        .ok_or_else(not_found)?;

    PriceDefinition::find_by_id(link.price_definition_id)
        .one(conn)
        .await?
        .ok_or_else(not_found)
}

/// Validates the row's season against the definition's seasonality and
/// resolves it to a season id.
///
/// Non-seasonal definitions must come with an empty season name and resolve
/// to `None`. Seasonal definitions require a season name that matches one of
/// the seasons of their own season definition, case-insensitively; season
/// names from other definitions do not count.
///
/// # Errors
/// Returns [`Error::InvalidSeason`] describing which rule was violated.
pub async fn validate_season_compatibility<C: ConnectionTrait>(
    conn: &C,
    definition: &price_definition::Model,
    season_name: &str,
) -> Result<Option<i64>> {
    if !definition.is_seasonal() {
        if season_name.is_empty() {
            return Ok(None);
        }
        return Err(Error::InvalidSeason {
            message: format!(
                "definition does not accept seasons, but season '{season_name}' was given"
            ),
        });
    }

    if season_name.is_empty() {
        return Err(Error::InvalidSeason {
            message: "definition requires a season, but none was given".to_string(),
        });
    }

    let Some(season_definition_id) = definition.season_definition_id else {
        return Err(Error::InvalidSeason {
            message: "seasonal definition has no season definition configured".to_string(),
        });
    };

    let wanted = season_name.to_lowercase();
    let seasons = Season::find()
        .filter(SeasonColumn::SeasonDefinitionId.eq(season_definition_id))
        .all(conn)
        .await?;
    seasons
        .into_iter()
        .find(|s| s.name.to_lowercase() == wanted)
        .map(|s| Some(s.id))
        .ok_or_else(|| Error::InvalidSeason {
            message: format!("season '{season_name}' is not valid for this definition"),
        })
}

/// The unit counts a definition permits for one time measurement, or `None`
/// when that measurement has no list configured. Months always permits
/// exactly `[1]`, with no per-definition list.
#[must_use]
pub fn allowed_units(
    definition: &price_definition::Model,
    time_measurement: TimeMeasurement,
) -> Option<Vec<i32>> {
    let list = match time_measurement {
        TimeMeasurement::Days => definition.units_days.as_deref(),
        TimeMeasurement::Hours => definition.units_hours.as_deref(),
        TimeMeasurement::Minutes => definition.units_minutes.as_deref(),
        TimeMeasurement::Months => return Some(vec![1]),
    };
    list.map(parse_units_list)
}

/// Validates that `units` appears in the definition's enumerated list for
/// the given time measurement. Membership is exact: a days-list of
/// `1,2,4,15` rejects 30 outright, it never rounds to the nearest value.
///
/// # Errors
/// Returns [`Error::InvalidUnits`] naming the rejected value and the valid
/// set, also when the measurement has no list configured at all.
pub fn validate_units_allowed(
    definition: &price_definition::Model,
    time_measurement: TimeMeasurement,
    units: i32,
) -> Result<()> {
    let allowed = allowed_units(definition, time_measurement).unwrap_or_default();
    if allowed.contains(&units) {
        return Ok(());
    }
    Err(Error::InvalidUnits {
        units,
        time_measurement: time_measurement.as_str().to_string(),
        allowed: allowed
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(","),
    })
}

/// Parses a comma-separated unit list (`"1,2,4,15"`) into integers,
/// skipping malformed entries.
fn parse_units_list(raw: &str) -> Vec<i32> {
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}
