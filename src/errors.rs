//! Unified error types for the import pipeline.
//!
//! Row-scoped errors (missing fields, malformed values, business-rule
//! failures) are recorded per row and never stop iteration over the rest of
//! the file. File-scoped errors (bad header, rollback threshold, exhausted
//! retries, database failures) abort the whole run. The [`ErrorCategory`]
//! mapping gives every surfaced error a machine-readable category for the
//! aggregate report, so callers never have to branch on error text.

use serde::Serialize;
use thiserror::Error;

/// All errors produced by the import pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The CSV header is missing one or more required columns. File-scoped:
    /// no row is processed when this is raised.
    #[error("CSV header error: {message}")]
    Header {
        /// Description of the missing columns
        message: String,
    },

    /// A required field was empty after trimming.
    #[error("missing field: {field}")]
    MissingField {
        /// Name of the empty column
        field: String,
    },

    /// The price cell could not be parsed as a non-negative number.
    #[error("invalid price '{value}': {reason}")]
    InvalidPriceFormat {
        /// Raw cell content
        value: String,
        /// Why parsing failed
        reason: String,
    },

    /// The units cell could not be parsed as a positive integer.
    #[error("invalid units '{value}': expected a positive integer")]
    InvalidUnitsFormat {
        /// Raw cell content
        value: String,
    },

    /// The time measurement cell matched none of the recognized synonyms.
    #[error("unknown time measurement '{value}' (expected days/hours/minutes/months)")]
    InvalidTimeMeasurement {
        /// Raw cell content
        value: String,
    },

    /// No catalog entry links the given category/location/rate-type triple.
    #[error(
        "no price definition found for category '{category_code}', location '{rental_location}', rate type '{rate_type}'"
    )]
    PriceDefinitionNotFound {
        /// Category code from the row
        category_code: String,
        /// Rental location name from the row
        rental_location: String,
        /// Rate type name from the row
        rate_type: String,
    },

    /// The season on the row is incompatible with the resolved definition.
    #[error("invalid season: {message}")]
    InvalidSeason {
        /// What made the season invalid
        message: String,
    },

    /// The unit count is not in the definition's enumerated list.
    #[error("units {units} not allowed for {time_measurement}; valid values: {allowed}")]
    InvalidUnits {
        /// Rejected unit count
        units: i32,
        /// Canonical time measurement the list belongs to
        time_measurement: String,
        /// The permitted values, comma-separated
        allowed: String,
    },

    /// The per-file error rate crossed 50%, so the transaction was rolled
    /// back and nothing from this run was persisted.
    #[error("import rolled back: error rate {error_rate:.3} exceeds the 0.5 threshold")]
    RollbackThreshold {
        /// Observed error rate, 0.0 to 1.0
        error_rate: f64,
    },

    /// The import file itself was rejected before parsing (missing, wrong
    /// extension, too large).
    #[error("import file rejected: {message}")]
    ImportFile {
        /// What made the file unacceptable
        message: String,
    },

    /// Configuration error (catalog seed file, environment)
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// CSV parsing error from the `csv` crate
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error when emitting a report
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is row-scoped: recorded against one row without
    /// aborting the rest of the file.
    #[must_use]
    pub const fn is_row_level(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::InvalidPriceFormat { .. }
                | Self::InvalidUnitsFormat { .. }
                | Self::InvalidTimeMeasurement { .. }
                | Self::PriceDefinitionNotFound { .. }
                | Self::InvalidSeason { .. }
                | Self::InvalidUnits { .. }
        )
    }

    /// Whether this error looks like transient storage contention that a
    /// whole-operation retry can recover from. SQLite reports `database is
    /// locked`; MySQL-family backends report deadlocks and lock wait
    /// timeouts, so all three patterns are matched against the raw text.
    #[must_use]
    pub fn is_transient_contention(&self) -> bool {
        let Self::Database(db_err) = self else {
            return false;
        };
        let text = db_err.to_string().to_lowercase();
        text.contains("deadlock")
            || text.contains("lock wait timeout")
            || text.contains("database is locked")
    }

    /// Maps this error onto its report category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingField { .. } => ErrorCategory::MissingRequiredField,
            Self::InvalidPriceFormat { .. } => ErrorCategory::InvalidPriceFormat,
            Self::InvalidUnitsFormat { .. } | Self::InvalidUnits { .. } => {
                ErrorCategory::InvalidUnitsFormat
            }
            Self::InvalidTimeMeasurement { .. } => ErrorCategory::InvalidTimeMeasurement,
            Self::PriceDefinitionNotFound { .. } => ErrorCategory::PriceDefinitionNotFound,
            Self::InvalidSeason { .. } => ErrorCategory::InvalidSeason,
            Self::Header { .. }
            | Self::RollbackThreshold { .. }
            | Self::ImportFile { .. }
            | Self::Config { .. }
            | Self::Database(_)
            | Self::Csv(_)
            | Self::Json(_)
            | Self::Io(_) => ErrorCategory::UnexpectedError,
        }
    }
}

/// Machine-readable error categories surfaced in the aggregate report.
///
/// Serialized in kebab-case (`missing-required-field`, `invalid-season`, ...)
/// so the report's `errors_by_type` keys are stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    /// A required column was empty
    MissingRequiredField,
    /// The price cell was malformed or negative
    InvalidPriceFormat,
    /// The units cell was malformed, non-positive, or not in the allowed set
    InvalidUnitsFormat,
    /// The category/location/rate-type triple resolved to no definition
    PriceDefinitionNotFound,
    /// The season was missing, unexpected, or unknown for the definition
    InvalidSeason,
    /// The time measurement matched no recognized synonym
    InvalidTimeMeasurement,
    /// Anything that is not a recognized row-level failure
    UnexpectedError,
}

impl ErrorCategory {
    /// Stable kebab-case name, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingRequiredField => "missing-required-field",
            Self::InvalidPriceFormat => "invalid-price-format",
            Self::InvalidUnitsFormat => "invalid-units-format",
            Self::PriceDefinitionNotFound => "price-definition-not-found",
            Self::InvalidSeason => "invalid-season",
            Self::InvalidTimeMeasurement => "invalid-time-measurement",
            Self::UnexpectedError => "unexpected-error",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
