//! Import orchestration: file checks, the transaction scope, contention
//! retry, and report assembly.
//!
//! One CSV file is one transaction. Rows are processed strictly in file
//! order, so a later row's upsert sees price rows created by earlier rows of
//! the same run. Row-level failures are recorded and iteration continues;
//! after the last row the error rate decides between commit and rollback.
//! The whole operation (never an individual row) is retried on transient
//! storage contention.

use crate::{
    core::{
        report::{self, ImportReport, RowOutcome},
        resolver, suggestions,
        upsert::{self, UpsertAction},
    },
    errors::{Error, Result},
    import::{HeaderMap, RowRecord, TimeMeasurement, fields},
};
use csv::ReaderBuilder;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Serialize;
use std::{fs::File, io::BufReader, path::Path, time::Duration};

/// Import files above this size are rejected before parsing.
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Error rate above which the whole batch is rolled back.
pub const ROLLBACK_THRESHOLD: f64 = 0.5;

/// Whole-operation retries after the initial attempt on transient
/// contention; a file may be attempted up to `MAX_RETRIES + 1` times.
const MAX_RETRIES: u32 = 3;

/// Base backoff between attempts; multiplied by the attempt number.
const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Retries `operation` on transient storage contention, up to
/// [`MAX_RETRIES`] times after the initial attempt, sleeping
/// `RETRY_BACKOFF × attempt` between tries (0.1s, 0.2s, 0.3s). Any other
/// error is returned unchanged, as is a contention error that survives the
/// final retry.
async fn retry_on_contention<T, F, Fut>(mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_transient_contention() && attempt <= MAX_RETRIES => {
                let backoff = RETRY_BACKOFF * attempt;
                tracing::warn!(
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    %error,
                    "Transient contention, retrying whole batch"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

/// Final result of one import run, with an explicit discriminant so callers
/// and the JSON output never infer the outcome from field presence.
#[derive(Debug, Serialize)]
#[serde(tag = "result_type", rename_all = "snake_case")]
pub enum ImportResult {
    /// Committed with every row successful
    Success {
        /// Aggregate report for the run
        report: ImportReport,
    },
    /// Committed, but some rows failed and were skipped
    Partial {
        /// Aggregate report for the run
        report: ImportReport,
    },
    /// Rolled back because the error rate crossed the threshold; nothing
    /// from this run was persisted
    RolledBack {
        /// Aggregate report for the run (rows listed here were not kept)
        report: ImportReport,
        /// Observed error rate, 0.0 to 1.0
        error_rate: f64,
        /// Canonical threshold error text, from [`Error::RollbackThreshold`]
        message: String,
    },
}

impl ImportResult {
    /// Whether the run committed with zero failed rows.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Whether the run's writes were committed.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Partial { .. })
    }

    /// The aggregate report, regardless of outcome.
    #[must_use]
    pub const fn report(&self) -> &ImportReport {
        match self {
            Self::Success { report } | Self::Partial { report } | Self::RolledBack { report, .. } => {
                report
            }
        }
    }
}

/// Imports a CSV price file as one transactional batch.
///
/// The file must exist, carry a `.csv` extension, and be at most
/// [`MAX_FILE_SIZE_BYTES`]. Header and rows are parsed once; on transient
/// contention the batch (not the file parse) is re-run from the start.
///
/// # Errors
/// Returns an error for a rejected file, a bad header, CSV syntax errors,
/// exhausted contention retries, or any database failure. Row-level
/// validation failures are not errors; they land in the report.
pub async fn import_csv(db: &DatabaseConnection, path: &Path) -> Result<ImportResult> {
    validate_file(path)?;
    let rows = read_rows(path)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Starting price import");

    let row_slice = rows.as_slice();
    let batch = retry_on_contention(|| run_batch(db, row_slice)).await?;

    let report = report::build_report(&batch.outcomes);
    tracing::info!(
        total = report.summary.total_rows,
        failed = report.summary.failed_rows,
        committed = batch.committed,
        "Import finished"
    );

    if !batch.committed {
        let error = Error::RollbackThreshold {
            error_rate: batch.error_rate,
        };
        return Ok(ImportResult::RolledBack {
            report,
            error_rate: batch.error_rate,
            message: error.to_string(),
        });
    }
    if report.summary.failed_rows == 0 {
        Ok(ImportResult::Success { report })
    } else {
        Ok(ImportResult::Partial { report })
    }
}

/// Runs the validation chain for up to `max_rows` rows without writing
/// anything: no upsert, no transaction. Lets a caller assess a file before
/// committing to a full import.
///
/// # Errors
/// Returns an error for a rejected file, a bad header, CSV syntax errors,
/// or a database failure during reference-data lookups.
pub async fn preview_csv(
    db: &DatabaseConnection,
    path: &Path,
    max_rows: usize,
) -> Result<ImportReport> {
    validate_file(path)?;
    let rows = read_rows(path)?;
    tracing::info!(path = %path.display(), max_rows, "Previewing price import");

    let mut outcomes = Vec::new();
    for row in rows.iter().take(max_rows) {
        match validate_row(db, row).await {
            Ok(()) => outcomes.push(RowOutcome::Valid { line: row.line }),
            Err(error) if error.is_row_level() => {
                outcomes.push(failed_outcome(db, row, error).await);
            }
            Err(error) => return Err(error),
        }
    }
    Ok(report::build_report(&outcomes))
}

/// One attempted pass over all rows inside a single transaction.
struct BatchRun {
    outcomes: Vec<RowOutcome>,
    committed: bool,
    error_rate: f64,
}

async fn run_batch(db: &DatabaseConnection, rows: &[RowRecord]) -> Result<BatchRun> {
    let txn = db.begin().await?;

    let mut outcomes = Vec::with_capacity(rows.len());
    for row in rows {
        match process_row(&txn, row).await {
            Ok(outcome) => outcomes.push(outcome),
            Err(error) if error.is_row_level() => {
                outcomes.push(failed_outcome(&txn, row, error).await);
            }
            Err(error) => {
                // Unexpected failure: abort the file, keep nothing. The
                // original error is the one to surface, so a failing
                // rollback must not replace it.
                if let Err(rollback_error) = txn.rollback().await {
                    tracing::warn!(%rollback_error, "Rollback after aborted batch failed");
                }
                return Err(error);
            }
        }
    }

    // Evaluated once, after every row has been attempted
    let total = outcomes.len();
    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    let error_rate = if total == 0 {
        0.0
    } else {
        failed as f64 / total as f64
    };

    if error_rate > ROLLBACK_THRESHOLD {
        txn.rollback().await?;
        tracing::warn!(error_rate, "Error rate above threshold, batch rolled back");
        return Ok(BatchRun {
            outcomes,
            committed: false,
            error_rate,
        });
    }

    txn.commit().await?;
    Ok(BatchRun {
        outcomes,
        committed: true,
        error_rate,
    })
}

/// Full per-row chain: field validation, business-rule resolution, upsert.
async fn process_row<C: ConnectionTrait>(conn: &C, row: &RowRecord) -> Result<RowOutcome> {
    fields::validate_required(row)?;
    let price = fields::parse_price(&row.price)?.ok_or_else(|| Error::MissingField {
        field: "price".to_string(),
    })?;
    let units = fields::parse_units(&row.units)?;
    let time_measurement = TimeMeasurement::parse(&row.time_measurement)?;

    let definition = resolver::resolve_price_definition(
        conn,
        &row.category_code,
        &row.rental_location_name,
        &row.rate_type_name,
    )
    .await?;
    let season_id =
        resolver::validate_season_compatibility(conn, &definition, &row.season_name).await?;
    resolver::validate_units_allowed(&definition, time_measurement, units)?;

    let result =
        upsert::upsert_price(conn, definition.id, season_id, time_measurement, units, price)
            .await?;
    Ok(match result.action {
        UpsertAction::Created => RowOutcome::Created {
            line: row.line,
            price_id: result.price_id,
        },
        UpsertAction::Updated => RowOutcome::Updated {
            line: row.line,
            price_id: result.price_id,
        },
    })
}

/// Validation-only chain used by preview: identical to [`process_row`] up to
/// the upsert, which it skips.
async fn validate_row<C: ConnectionTrait>(conn: &C, row: &RowRecord) -> Result<()> {
    fields::validate_required(row)?;
    fields::parse_price(&row.price)?;
    let units = fields::parse_units(&row.units)?;
    let time_measurement = TimeMeasurement::parse(&row.time_measurement)?;

    let definition = resolver::resolve_price_definition(
        conn,
        &row.category_code,
        &row.rental_location_name,
        &row.rate_type_name,
    )
    .await?;
    resolver::validate_season_compatibility(conn, &definition, &row.season_name).await?;
    resolver::validate_units_allowed(&definition, time_measurement, units)
}

async fn failed_outcome<C: ConnectionTrait>(
    conn: &C,
    row: &RowRecord,
    error: Error,
) -> RowOutcome {
    tracing::debug!(line = row.line, %error, "Row failed");
    let suggestions = suggestions::suggest_corrections(conn, row, &error).await;
    RowOutcome::Failed {
        line: row.line,
        error: error.to_string(),
        error_type: error.category(),
        data: row.clone(),
        suggestions,
    }
}

/// Rejects the file before parsing: it must exist, be a regular `.csv`
/// file, and be at most [`MAX_FILE_SIZE_BYTES`].
fn validate_file(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|_| Error::ImportFile {
        message: format!("file not found: {}", path.display()),
    })?;
    if !metadata.is_file() {
        return Err(Error::ImportFile {
            message: format!("not a regular file: {}", path.display()),
        });
    }
    let has_csv_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !has_csv_extension {
        return Err(Error::ImportFile {
            message: "expected a .csv extension".to_string(),
        });
    }
    if metadata.len() > MAX_FILE_SIZE_BYTES {
        return Err(Error::ImportFile {
            message: format!(
                "file is {} bytes, limit is {MAX_FILE_SIZE_BYTES}",
                metadata.len()
            ),
        });
    }
    Ok(())
}

/// Parses header and all data rows up front. Retries replay these parsed
/// rows rather than re-reading the file.
fn read_rows(path: &Path) -> Result<Vec<RowRecord>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let header = HeaderMap::from_headers(reader.headers()?)?;

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        // +2: 1-indexed lines, header is line 1
        rows.push(RowRecord::from_record(index as u64 + 2, &header, &record));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::Price;
    use crate::errors::ErrorCategory;
    use crate::test_utils::{seed_test_catalog, setup_test_db, write_csv};
    use sea_orm::EntityTrait;
    use std::sync::atomic::{AtomicU32, Ordering};

    const HEADER: &str =
        "category_code,rental_location_name,rate_type_name,season_name,time_measurement,units,price";

    #[tokio::test]
    async fn test_import_creates_price_end_to_end() -> Result<()> {
        let db = setup_test_db().await?;
        seed_test_catalog(&db).await?;
        let dir = tempfile::tempdir()?;
        let path = write_csv(&dir, "prices.csv", &format!("{HEADER}\nA,Barcelona,Estándar,Alta,days,2,25.50\n"));

        let result = import_csv(&db, &path).await?;
        assert!(result.is_success());
        assert_eq!(result.report().summary.created_prices, 1);

        let rows = Price::find().all(&db).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].price, 25.50);
        assert_eq!(rows[0].time_measurement, "days");
        assert_eq!(rows[0].units, 2);
        assert!(rows[0].season_id.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_reimport_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        seed_test_catalog(&db).await?;
        let dir = tempfile::tempdir()?;
        let content = format!(
            "{HEADER}\nA,Barcelona,Estándar,Alta,days,2,25.50\nB,Barcelona,Estándar,,days,7,120\n"
        );
        let path = write_csv(&dir, "prices.csv", &content);

        let first = import_csv(&db, &path).await?;
        assert_eq!(first.report().summary.created_prices, 2);

        let second = import_csv(&db, &path).await?;
        let summary = &second.report().summary;
        assert!(second.is_success());
        assert_eq!(summary.created_prices, 0);
        assert_eq!(summary.updated_prices, 2);
        assert_eq!(summary.successful_rows, summary.total_rows);
        assert_eq!(Price::find().all(&db).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_row_does_not_stop_iteration() -> Result<()> {
        let db = setup_test_db().await?;
        seed_test_catalog(&db).await?;
        let dir = tempfile::tempdir()?;
        let content = format!(
            "{HEADER}\n,Barcelona,Estándar,Alta,days,2,25.50\nB,Barcelona,Estándar,,days,7,120\n"
        );
        let path = write_csv(&dir, "prices.csv", &content);

        let result = import_csv(&db, &path).await?;
        // 1 of 2 failed: exactly at the threshold, still committed
        assert!(result.is_committed());
        assert!(!result.is_success());

        let report = result.report();
        assert_eq!(report.summary.failed_rows, 1);
        assert_eq!(report.summary.created_prices, 1);
        assert_eq!(report.summary.success_rate, 50.0);
        assert_eq!(
            report.errors_by_type[&ErrorCategory::MissingRequiredField],
            1
        );
        let detail = &report.detailed_errors[0];
        assert_eq!(detail.line, 2);
        assert!(detail.error.contains("category_code"));

        assert_eq!(Price::find().all(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_rollback_threshold_discards_whole_batch() -> Result<()> {
        let db = setup_test_db().await?;
        seed_test_catalog(&db).await?;
        let dir = tempfile::tempdir()?;
        let content = format!(
            "{HEADER}\nZ,Barcelona,Estándar,Alta,days,2,10\nZ,Barcelona,Estándar,Alta,days,4,10\nA,Barcelona,Estándar,Alta,days,2,25.50\n"
        );
        let path = write_csv(&dir, "prices.csv", &content);

        let result = import_csv(&db, &path).await?;
        match result {
            ImportResult::RolledBack {
                report,
                error_rate,
                message,
            } => {
                assert!(error_rate > ROLLBACK_THRESHOLD);
                assert!(message.contains("exceeds the 0.5 threshold"));
                assert_eq!(report.summary.failed_rows, 2);
                // The good row was attempted but not kept
                assert_eq!(report.summary.created_prices, 1);
            }
            other => panic!("expected RolledBack, got {other:?}"),
        }
        assert_eq!(Price::find().all(&db).await?.len(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_later_row_updates_earlier_row_same_run() -> Result<()> {
        let db = setup_test_db().await?;
        seed_test_catalog(&db).await?;
        let dir = tempfile::tempdir()?;
        let content = format!(
            "{HEADER}\nB,Barcelona,Estándar,,days,7,100\nB,Barcelona,Estándar,,days,7,110\n"
        );
        let path = write_csv(&dir, "prices.csv", &content);

        let result = import_csv(&db, &path).await?;
        let summary = &result.report().summary;
        assert_eq!(summary.created_prices, 1);
        assert_eq!(summary.updated_prices, 1);

        let rows = Price::find().all(&db).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].price, 110.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_unresolvable_triple_names_keys_in_report() -> Result<()> {
        let db = setup_test_db().await?;
        seed_test_catalog(&db).await?;
        let dir = tempfile::tempdir()?;
        let content = format!(
            "{HEADER}\nZ,Barcelona,Estándar,Alta,days,2,10\nA,Barcelona,Estándar,Alta,days,2,25.50\n"
        );
        let path = write_csv(&dir, "prices.csv", &content);

        let result = import_csv(&db, &path).await?;
        let detail = &result.report().detailed_errors[0];
        assert_eq!(detail.error_type, ErrorCategory::PriceDefinitionNotFound);
        assert!(detail.error.contains('Z'));
        assert!(detail.error.contains("Barcelona"));
        assert!(detail.error.contains("Estándar"));
        Ok(())
    }

    #[tokio::test]
    async fn test_exact_units_enforcement_with_nearest_suggestion() -> Result<()> {
        let db = setup_test_db().await?;
        seed_test_catalog(&db).await?;
        let dir = tempfile::tempdir()?;
        let content = format!(
            "{HEADER}\nA,Barcelona,Estándar,Alta,days,30,25.50\nA,Barcelona,Estándar,Alta,days,4,25.50\n"
        );
        let path = write_csv(&dir, "prices.csv", &content);

        let result = import_csv(&db, &path).await?;
        let report = result.report();
        assert_eq!(report.summary.failed_rows, 1);
        assert_eq!(report.summary.created_prices, 1);

        let detail = &report.detailed_errors[0];
        assert_eq!(detail.error_type, ErrorCategory::InvalidUnitsFormat);
        assert!(detail.suggestions[0].contains("15"));

        // No nearest-fit substitution happened: only units=4 was written
        let rows = Price::find().all(&db).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].units, 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_header_aborts_before_rows() -> Result<()> {
        let db = setup_test_db().await?;
        seed_test_catalog(&db).await?;
        let dir = tempfile::tempdir()?;
        let path = write_csv(&dir, "prices.csv", "category_code,units,price\nA,2,25.50\n");

        let err = import_csv(&db, &path).await.unwrap_err();
        assert!(matches!(err, Error::Header { .. }));
        assert_eq!(Price::find().all(&db).await?.len(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_file_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let dir = tempfile::tempdir()?;

        let missing = dir.path().join("nope.csv");
        assert!(matches!(
            import_csv(&db, &missing).await.unwrap_err(),
            Error::ImportFile { .. }
        ));

        let wrong_ext = write_csv(&dir, "prices.txt", "whatever");
        assert!(matches!(
            import_csv(&db, &wrong_ext).await.unwrap_err(),
            Error::ImportFile { .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_preview_validates_without_writing() -> Result<()> {
        let db = setup_test_db().await?;
        seed_test_catalog(&db).await?;
        let dir = tempfile::tempdir()?;
        let content = format!(
            "{HEADER}\nA,Barcelona,Estándar,Alta,days,2,25.50\nZ,Barcelona,Estándar,Alta,days,2,10\nA,Barcelona,Estándar,Alta,days,4,30\n"
        );
        let path = write_csv(&dir, "prices.csv", &content);

        let report = preview_csv(&db, &path, 2).await?;
        assert_eq!(report.summary.total_rows, 2);
        assert_eq!(report.summary.successful_rows, 1);
        assert_eq!(report.summary.failed_rows, 1);
        assert_eq!(report.summary.created_prices, 0);

        // Nothing written
        assert_eq!(Price::find().all(&db).await?.len(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_contention_replays_operation_until_success() -> Result<()> {
        let calls = AtomicU32::new(0);

        let value = retry_on_contention(|| {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if call < 2 {
                    Err(Error::Database(sea_orm::DbErr::Custom(
                        "database is locked".to_string(),
                    )))
                } else {
                    Ok(call)
                }
            }
        })
        .await?;

        // Two locked attempts, then the whole operation runs again and wins
        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_contention_retries_exhausted_surfaces_error() {
        let calls = AtomicU32::new(0);

        let result: Result<()> = retry_on_contention(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(Error::Database(sea_orm::DbErr::Custom(
                    "database is locked".to_string(),
                )))
            }
        })
        .await;

        let error = result.unwrap_err();
        assert!(error.is_transient_contention());
        // Initial attempt plus three retries
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_non_transient_error_is_not_retried() {
        let calls = AtomicU32::new(0);

        let result: Result<()> = retry_on_contention(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::Database(sea_orm::DbErr::Custom("syntax error".to_string()))) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unexpected_error_aborts_file_with_original_cause() -> Result<()> {
        let db = setup_test_db().await?;
        seed_test_catalog(&db).await?;
        let dir = tempfile::tempdir()?;
        let path = write_csv(
            &dir,
            "prices.csv",
            &format!("{HEADER}\nA,Barcelona,Estándar,Alta,days,2,25.50\n"),
        );

        // Rows validate against reference data, but the write target is gone
        db.execute_unprepared("DROP TABLE prices").await?;

        let error = import_csv(&db, &path).await.unwrap_err();
        assert!(matches!(error, Error::Database(_)));
        assert!(error.to_string().contains("prices"));
        Ok(())
    }

    #[tokio::test]
    async fn test_bom_and_spanish_time_units_accepted() -> Result<()> {
        let db = setup_test_db().await?;
        seed_test_catalog(&db).await?;
        let dir = tempfile::tempdir()?;
        let content = format!("\u{feff}{HEADER}\nA,Barcelona,Estándar,Alta,Días,2,25.50\n");
        let path = write_csv(&dir, "prices.csv", &content);

        let result = import_csv(&db, &path).await?;
        assert!(result.is_success());
        let rows = Price::find().all(&db).await?;
        assert_eq!(rows[0].time_measurement, "days");
        Ok(())
    }
}
