//! The import pipeline: ordered, continue-on-error row processing.

use crate::import::outcome::{FailureKind, ImportOutcome};
use crate::import::rows::RawRow;
use crate::import::validator::{self, DUPLICATE_EMAIL_REASON};
use crate::store::EmployeeStore;

/// Display row number of the first data row: row 1 is the header.
pub const FIRST_DATA_ROW: usize = 2;

/// Processes an ordered batch of raw rows into employee creations.
///
/// Rows are handled strictly sequentially so duplicate detection and row
/// numbering stay deterministic: when two rows in one batch share an email,
/// the first is persisted before the second is checked, and the second is
/// rejected as a duplicate. A failed row never rolls back or aborts its
/// siblings, which is why the batch does not run in one transaction.
pub struct ImportPipeline<'a> {
    store: &'a EmployeeStore,
}

impl<'a> ImportPipeline<'a> {
    pub fn new(store: &'a EmployeeStore) -> Self {
        Self { store }
    }

    /// Run the batch to completion and return the aggregated outcome. The
    /// failure list preserves input row order.
    pub async fn run(&self, rows: Vec<RawRow>) -> ImportOutcome {
        let total = rows.len();
        let mut outcome = ImportOutcome::default();

        for (index, row) in rows.into_iter().enumerate() {
            let row_number = index + FIRST_DATA_ROW;
            self.process_row(row_number, row, &mut outcome).await;
        }

        log::info!(
            "import batch finished: {} imported, {} failed of {} rows",
            outcome.imported,
            outcome.failed,
            total
        );

        outcome
    }

    async fn process_row(&self, row_number: usize, row: RawRow, outcome: &mut ImportOutcome) {
        let candidate = match validator::validate_row(&row) {
            Ok(candidate) => candidate,
            Err(rejection) => {
                outcome.record_failure(row_number, row, rejection.kind, rejection.reason);
                return;
            }
        };

        // Friendly duplicate check; the unique constraint remains the
        // backstop for races with concurrent imports.
        match self.store.find_by_email(&candidate.email).await {
            Ok(Some(_)) => {
                outcome.record_failure(
                    row_number,
                    row,
                    FailureKind::DuplicateEmail,
                    DUPLICATE_EMAIL_REASON,
                );
                return;
            }
            Ok(None) => {}
            Err(err) => {
                outcome.record_failure(
                    row_number,
                    row,
                    FailureKind::PersistenceError,
                    err.to_string(),
                );
                return;
            }
        }

        match self.store.insert(&candidate).await {
            Ok(_) => outcome.record_success(),
            Err(err) => {
                outcome.record_failure(
                    row_number,
                    row,
                    FailureKind::PersistenceError,
                    err.to_string(),
                );
            }
        }
    }
}
