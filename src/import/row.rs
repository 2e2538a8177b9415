//! Header normalization and row extraction.
//!
//! The header row is mapped case-insensitively onto the recognized column
//! set; unknown columns are ignored and missing required columns abort the
//! run before any row is read. Each data row is then extracted into a
//! [`RowRecord`] with every cell trimmed, so downstream validation never
//! deals with raw CSV positions again.

use crate::errors::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;

/// Columns that must be present in the header.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "category_code",
    "rental_location_name",
    "rate_type_name",
    "season_name",
    "time_measurement",
    "units",
    "price",
];

/// Columns that may be present; absent cells map to empty strings.
pub const OPTIONAL_COLUMNS: [&str; 2] = ["included_km", "extra_km_price"];

/// Case-insensitive mapping from recognized column name to index.
#[derive(Debug, Clone)]
pub struct HeaderMap {
    columns: HashMap<String, usize>,
}

impl HeaderMap {
    /// Builds the mapping from a header record.
    ///
    /// Header names are trimmed and lower-cased before matching; a leading
    /// UTF-8 byte-order marker on the first cell is stripped.
    ///
    /// # Errors
    /// Returns [`Error::Header`] naming every missing required column.
    pub fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let mut columns = HashMap::new();
        for (index, name) in headers.iter().enumerate() {
            let normalized = name.trim_start_matches('\u{feff}').trim().to_lowercase();
            columns.entry(normalized).or_insert(index);
        }

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .into_iter()
            .filter(|name| !columns.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            return Err(Error::Header {
                message: format!("missing required columns: {}", missing.join(", ")),
            });
        }

        Ok(Self { columns })
    }

    /// Index of a recognized column, if the header contained it.
    #[must_use]
    pub fn index(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }
}

/// One CSV row extracted into named, trimmed fields.
///
/// All fields are kept as strings here; typed parsing belongs to the field
/// validator so the raw values survive into error reports untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowRecord {
    /// 1-based line number in the file (the header is line 1)
    pub line: u64,
    /// Category business code
    pub category_code: String,
    /// Rental location name
    pub rental_location_name: String,
    /// Rate type name
    pub rate_type_name: String,
    /// Season name, empty for non-seasonal rows
    pub season_name: String,
    /// Raw time measurement cell
    pub time_measurement: String,
    /// Raw units cell
    pub units: String,
    /// Raw price cell
    pub price: String,
    /// Raw included kilometers cell (optional column)
    pub included_km: String,
    /// Raw extra kilometer price cell (optional column)
    pub extra_km_price: String,
}

impl RowRecord {
    /// Extracts a trimmed field record from one CSV row.
    ///
    /// Cells beyond the row's length and absent optional columns both map to
    /// the empty string. Pure function of header and row.
    #[must_use]
    pub fn from_record(line: u64, header: &HeaderMap, record: &csv::StringRecord) -> Self {
        let field = |name: &str| -> String {
            header
                .index(name)
                .and_then(|i| record.get(i))
                .map(|cell| cell.trim().to_string())
                .unwrap_or_default()
        };

        Self {
            line,
            category_code: field("category_code"),
            rental_location_name: field("rental_location_name"),
            rate_type_name: field("rate_type_name"),
            season_name: field("season_name"),
            time_measurement: field("time_measurement"),
            units: field("units"),
            price: field("price"),
            included_km: field("included_km"),
            extra_km_price: field("extra_km_price"),
        }
    }
}
