//! Aggregate report types and arithmetic.
//!
//! Per-row outcomes are a tagged union with an explicit `result_type`
//! discriminant so callers (and the JSON output) never have to infer what
//! happened from which fields are present. The aggregate report rolls the
//! outcome list up into a summary, an error histogram, and the first few
//! failures in full detail.

use crate::{errors::ErrorCategory, import::RowRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Detailed errors are capped at this many entries per report.
pub const MAX_DETAILED_ERRORS: usize = 10;

/// Outcome of processing one CSV row.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result_type", rename_all = "snake_case")]
pub enum RowOutcome {
    /// A new price row was inserted
    Created {
        /// 1-based file line
        line: u64,
        /// ID of the inserted price row
        price_id: i64,
    },
    /// An existing price row was replaced
    Updated {
        /// 1-based file line
        line: u64,
        /// ID of the updated price row
        price_id: i64,
    },
    /// The row passed validation without being written (preview mode)
    Valid {
        /// 1-based file line
        line: u64,
    },
    /// The row failed validation or resolution
    Failed {
        /// 1-based file line
        line: u64,
        /// Human-readable error text
        error: String,
        /// Machine-readable error category
        error_type: ErrorCategory,
        /// The row's raw field values, for correction UIs
        data: RowRecord,
        /// Concrete correction hints
        suggestions: Vec<String>,
    },
}

impl RowOutcome {
    /// Whether this outcome counts as a successful row.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Created { .. } | Self::Updated { .. } | Self::Valid { .. }
        )
    }
}

/// Row counts for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    /// Rows processed (header excluded)
    pub total_rows: u64,
    /// Rows that validated (and, on import, were written)
    pub successful_rows: u64,
    /// Rows recorded as failed
    pub failed_rows: u64,
    /// Price rows inserted
    pub created_prices: u64,
    /// Price rows replaced
    pub updated_prices: u64,
    /// successful/total as a percentage, one decimal
    pub success_rate: f64,
}

/// One entry of the detailed-error list.
#[derive(Debug, Clone, Serialize)]
pub struct DetailedError {
    /// 1-based file line
    pub line: u64,
    /// Human-readable error text
    pub error: String,
    /// Machine-readable error category
    pub error_type: ErrorCategory,
    /// The row's raw field values
    pub data: RowRecord,
    /// Concrete correction hints
    pub suggestions: Vec<String>,
}

/// Aggregate report for one import or preview run.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    /// Row counts and success rate
    pub summary: ImportSummary,
    /// Failure count per error category
    pub errors_by_type: BTreeMap<ErrorCategory, u64>,
    /// Up to [`MAX_DETAILED_ERRORS`] failures in full detail, in file order
    pub detailed_errors: Vec<DetailedError>,
    /// When the report was generated
    pub timestamp: DateTime<Utc>,
}

/// Rolls an outcome list up into the aggregate report.
///
/// `successful_rows + failed_rows == total_rows` always holds, and the
/// success rate is rounded to one decimal. An empty outcome list reports a
/// 100% success rate.
#[must_use]
pub fn build_report(outcomes: &[RowOutcome]) -> ImportReport {
    let total = outcomes.len() as u64;
    let mut successful = 0u64;
    let mut created = 0u64;
    let mut updated = 0u64;
    let mut errors_by_type: BTreeMap<ErrorCategory, u64> = BTreeMap::new();
    let mut detailed_errors = Vec::new();

    for outcome in outcomes {
        match outcome {
            RowOutcome::Created { .. } => {
                successful += 1;
                created += 1;
            }
            RowOutcome::Updated { .. } => {
                successful += 1;
                updated += 1;
            }
            RowOutcome::Valid { .. } => successful += 1,
            RowOutcome::Failed {
                line,
                error,
                error_type,
                data,
                suggestions,
            } => {
                *errors_by_type.entry(*error_type).or_insert(0) += 1;
                if detailed_errors.len() < MAX_DETAILED_ERRORS {
                    detailed_errors.push(DetailedError {
                        line: *line,
                        error: error.clone(),
                        error_type: *error_type,
                        data: data.clone(),
                        suggestions: suggestions.clone(),
                    });
                }
            }
        }
    }

    let failed = total - successful;
    let success_rate = if total == 0 {
        100.0
    } else {
        (successful as f64 / total as f64 * 1000.0).round() / 10.0
    };

    ImportReport {
        summary: ImportSummary {
            total_rows: total,
            successful_rows: successful,
            failed_rows: failed,
            created_prices: created,
            updated_prices: updated,
            success_rate,
        },
        errors_by_type,
        detailed_errors,
        timestamp: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    fn failed(line: u64, error_type: ErrorCategory) -> RowOutcome {
        RowOutcome::Failed {
            line,
            error: "boom".to_string(),
            error_type,
            data: RowRecord {
                line,
                category_code: "A".to_string(),
                rental_location_name: "Barcelona".to_string(),
                rate_type_name: "Estándar".to_string(),
                season_name: String::new(),
                time_measurement: "days".to_string(),
                units: "2".to_string(),
                price: "25.50".to_string(),
                included_km: String::new(),
                extra_km_price: String::new(),
            },
            suggestions: vec!["fix it".to_string()],
        }
    }

    #[test]
    fn test_report_arithmetic() {
        let outcomes = vec![
            RowOutcome::Created { line: 2, price_id: 1 },
            RowOutcome::Updated { line: 3, price_id: 1 },
            failed(4, ErrorCategory::InvalidSeason),
        ];
        let report = build_report(&outcomes);
        let summary = &report.summary;

        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.successful_rows + summary.failed_rows, summary.total_rows);
        assert_eq!(summary.created_prices, 1);
        assert_eq!(summary.updated_prices, 1);
        assert_eq!(summary.success_rate, 66.7);
        assert_eq!(report.errors_by_type[&ErrorCategory::InvalidSeason], 1);
    }

    #[test]
    fn test_empty_report() {
        let report = build_report(&[]);
        assert_eq!(report.summary.total_rows, 0);
        assert_eq!(report.summary.success_rate, 100.0);
        assert!(report.detailed_errors.is_empty());
    }

    #[test]
    fn test_detailed_errors_capped_at_ten() {
        let outcomes: Vec<RowOutcome> = (2..=20)
            .map(|line| failed(line, ErrorCategory::MissingRequiredField))
            .collect();
        let report = build_report(&outcomes);

        assert_eq!(report.detailed_errors.len(), MAX_DETAILED_ERRORS);
        assert_eq!(report.detailed_errors[0].line, 2);
        assert_eq!(
            report.errors_by_type[&ErrorCategory::MissingRequiredField],
            19
        );
    }

    #[test]
    fn test_outcome_serializes_with_discriminant() {
        let json = serde_json::to_value(RowOutcome::Created { line: 2, price_id: 7 }).unwrap();
        assert_eq!(json["result_type"], "created");
        assert_eq!(json["price_id"], 7);

        let json = serde_json::to_value(failed(4, ErrorCategory::InvalidSeason)).unwrap();
        assert_eq!(json["result_type"], "failed");
        assert_eq!(json["error_type"], "invalid-season");
    }
}
