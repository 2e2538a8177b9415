//! Core business logic for the import pipeline.
//!
//! Everything in here is framework-agnostic: functions take a database
//! connection (or open transaction) and plain data, and return structured
//! results the binary or a web layer can format.

/// Import orchestration: file checks, transaction scope, retry, reporting
pub mod importer;
/// Aggregate report types and arithmetic
pub mod report;
/// Business-rule resolution against reference data
pub mod resolver;
/// Correction hints for failed rows
pub mod suggestions;
/// Price create-or-update by natural key
pub mod upsert;
