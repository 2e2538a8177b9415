//! Database-independent field validation.
//!
//! Everything here is a pure function over the trimmed cell strings of one
//! [`RowRecord`](super::row::RowRecord): required-field presence, numeric
//! parsing for price and units, and canonicalization of the time
//! measurement. Business rules that need reference data live in
//! [`crate::core::resolver`].

use crate::{
    errors::{Error, Result},
    import::row::RowRecord,
};
use serde::Serialize;

/// Canonical time measurement for a tariff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeMeasurement {
    /// Daily tariffs
    Days,
    /// Hourly tariffs
    Hours,
    /// Minute tariffs
    Minutes,
    /// Monthly tariffs (only 1 month is ever permitted)
    Months,
}

impl TimeMeasurement {
    /// Parses a raw cell against the recognized synonym set,
    /// case-insensitively. English and Spanish names are accepted, singular
    /// or plural.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTimeMeasurement`] when nothing matches.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "days" | "day" | "día" | "días" | "dia" | "dias" => Ok(Self::Days),
            "hours" | "hour" | "hora" | "horas" => Ok(Self::Hours),
            "minutes" | "minute" | "minuto" | "minutos" => Ok(Self::Minutes),
            "months" | "month" | "mes" | "meses" => Ok(Self::Months),
            _ => Err(Error::InvalidTimeMeasurement {
                value: raw.to_string(),
            }),
        }
    }

    /// Canonical lowercase name, as stored on price rows.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Months => "months",
        }
    }
}

impl std::fmt::Display for TimeMeasurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks that every required field of the row is non-empty after trimming.
/// `season_name` is not checked here; whether a season is required depends on
/// the resolved price definition.
///
/// # Errors
/// Returns [`Error::MissingField`] naming the first empty required field.
pub fn validate_required(record: &RowRecord) -> Result<()> {
    let required = [
        ("category_code", &record.category_code),
        ("rental_location_name", &record.rental_location_name),
        ("rate_type_name", &record.rate_type_name),
        ("time_measurement", &record.time_measurement),
        ("units", &record.units),
        ("price", &record.price),
    ];
    for (name, value) in required {
        if value.is_empty() {
            return Err(Error::MissingField {
                field: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Parses a price cell as a non-negative amount.
///
/// Accepts both `1234.56` and Spanish-style `1.234,56`: when both separators
/// appear, the last one is taken as the decimal mark and the other stripped
/// as a thousands separator; a lone comma is a decimal mark. An empty cell
/// yields `None` ("no price"), which only pure-validation contexts accept.
///
/// # Errors
/// Returns [`Error::InvalidPriceFormat`] for unparsable or negative values.
pub fn parse_price(raw: &str) -> Result<Option<f64>> {
    let compact: String = raw.trim().chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Ok(None);
    }

    let normalized = match (compact.rfind(','), compact.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => {
            compact.replace('.', "").replace(',', ".")
        }
        (Some(_), Some(_)) => compact.replace(',', ""),
        (Some(_), None) => compact.replace(',', "."),
        _ => compact.clone(),
    };

    let value: f64 = normalized.parse().map_err(|_| Error::InvalidPriceFormat {
        value: raw.to_string(),
        reason: "not a number".to_string(),
    })?;

    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidPriceFormat {
            value: raw.to_string(),
            reason: "must be a non-negative amount".to_string(),
        });
    }

    Ok(Some(value))
}

/// Parses a units cell as a positive integer.
///
/// # Errors
/// Returns [`Error::InvalidUnitsFormat`] for unparsable, zero, or negative
/// values.
pub fn parse_units(raw: &str) -> Result<i32> {
    let value: i32 = raw.trim().parse().map_err(|_| Error::InvalidUnitsFormat {
        value: raw.to_string(),
    })?;
    if value <= 0 {
        return Err(Error::InvalidUnitsFormat {
            value: raw.to_string(),
        });
    }
    Ok(value)
}
