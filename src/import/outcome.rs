//! Aggregated import result.
//!
//! Tracks what happened to each row of a batch. Produced once per import
//! invocation and returned to the caller; never persisted.

use crate::import::rows::RawRow;
use serde::{Deserialize, Serialize};

/// Classification of a row-level import failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    MissingRequiredField,
    ConstraintViolation,
    DuplicateEmail,
    PersistenceError,
}

/// One rejected row: its display row number, the raw data as uploaded, and
/// why it was rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowFailure {
    pub row: usize,
    pub raw_row: RawRow,
    pub reason: String,
    pub kind: FailureKind,
}

/// Result of processing one batch of rows.
///
/// `errors` preserves input row order; `imported + failed` equals the
/// number of rows processed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub imported: usize,
    pub failed: usize,
    pub errors: Vec<RowFailure>,
}

impl ImportOutcome {
    pub fn record_success(&mut self) {
        self.imported += 1;
    }

    pub fn record_failure(
        &mut self,
        row: usize,
        raw_row: RawRow,
        kind: FailureKind,
        reason: impl Into<String>,
    ) {
        self.failed += 1;
        self.errors.push(RowFailure {
            row,
            raw_row,
            reason: reason.into(),
            kind,
        });
    }

    /// Total number of rows this outcome accounts for.
    pub fn total(&self) -> usize {
        self.imported + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_preserve_recording_order() {
        let mut outcome = ImportOutcome::default();
        outcome.record_success();
        outcome.record_failure(3, RawRow::new(), FailureKind::MissingRequiredField, "Name and email are required");
        outcome.record_failure(4, RawRow::new(), FailureKind::DuplicateEmail, "Email already exists");

        assert_eq!(outcome.imported, 1);
        assert_eq!(outcome.failed, 2);
        assert_eq!(outcome.total(), 3);
        assert_eq!(outcome.errors[0].row, 3);
        assert_eq!(outcome.errors[1].row, 4);
        assert_eq!(outcome.errors[1].kind, FailureKind::DuplicateEmail);
    }

    #[test]
    fn wire_format_uses_camel_case_keys() {
        let mut outcome = ImportOutcome::default();
        outcome.record_failure(2, RawRow::new(), FailureKind::ConstraintViolation, "too long");

        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("errors").is_some());
        assert!(json["errors"][0].get("rawRow").is_some());
        assert_eq!(json["errors"][0]["kind"], "constraintViolation");
    }
}
