//! CSV-side pieces of the pipeline: header normalization and
//! database-independent field validation.

/// Per-row field parsing and validation (price, units, time measurement)
pub mod fields;
/// Header mapping and row extraction
pub mod row;

pub use fields::TimeMeasurement;
pub use row::{HeaderMap, RowRecord};
