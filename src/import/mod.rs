//! Bulk employee import.
//!
//! The import subsystem turns an uploaded tabular file into employee record
//! creations with row-granular error reporting:
//!
//! - **`rows`**: extracts a uniform sequence of raw rows (column name to
//!   cell text) from CSV or Excel bytes.
//!
//! - **`validator`**: per-row required-field and shape checks, producing a
//!   normalized candidate or a rejection. Pure, no I/O.
//!
//! - **`pipeline`**: processes rows strictly in order (validate, duplicate
//!   lookup, insert), continuing past row-level failures so one bad row
//!   never aborts the batch.
//!
//! - **`outcome`**: the aggregated result (imported/failed counts plus an
//!   ordered failure list) returned to the caller. Derived, never stored.
//!
//! Rows are processed sequentially rather than as a batched insert: the
//! duplicate check and error attribution must be row-granular, and a later
//! row repeating an earlier row's email has to see that earlier row already
//! persisted. Notification sends happen outside this module so the pipeline
//! stays free of network side effects.

pub mod outcome;
pub mod pipeline;
pub mod rows;
pub mod validator;

pub use outcome::{FailureKind, ImportOutcome, RowFailure};
pub use pipeline::ImportPipeline;
pub use rows::{RawRow, RowSourceError, rows_from_csv, rows_from_xlsx};
