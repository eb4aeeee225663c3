//! Row extraction from uploaded CSV and Excel files.
//!
//! Both readers produce the same shape, a map of trimmed header name to
//! trimmed cell text per row, so the pipeline is agnostic to the source
//! format. Fully blank rows (a spreadsheet fact of life, especially
//! trailing ones) are dropped before the pipeline numbers rows.

use calamine::{Reader, Xlsx};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::io::Cursor;
use thiserror::Error;

/// One uploaded row: column name to raw cell text.
pub type RawRow = HashMap<String, String>;

#[derive(Debug, Error)]
pub enum RowSourceError {
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Excel parse error: {0}")]
    Excel(String),
    #[error("workbook contains no worksheets")]
    NoWorksheet,
    #[error("worksheet contains no header row")]
    NoHeader,
}

/// Extract rows from CSV bytes. The first record is the header row.
pub fn rows_from_csv(bytes: &[u8]) -> Result<Vec<RawRow>, RowSourceError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(row) = assemble_row(&headers, record.iter()) {
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Extract rows from the first worksheet of an Excel workbook. The first
/// worksheet row is the header row; cells are rendered to text.
pub fn rows_from_xlsx(bytes: &[u8]) -> Result<Vec<RawRow>, RowSourceError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| RowSourceError::Excel(e.to_string()))?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = sheet_names
        .first()
        .cloned()
        .ok_or(RowSourceError::NoWorksheet)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| RowSourceError::Excel(e.to_string()))?;

    let mut worksheet_rows = range.rows();
    let header_row = worksheet_rows.next().ok_or(RowSourceError::NoHeader)?;
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for data_row in worksheet_rows {
        let cells = data_row.iter().map(|cell| cell.to_string());
        if let Some(row) = assemble_row(&headers, cells) {
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Zip one record's cells with the header names, returning `None` for rows
/// where every cell is blank.
fn assemble_row<I, S>(headers: &[String], cells: I) -> Option<RawRow>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut row = RawRow::new();
    for (index, value) in cells.into_iter().enumerate() {
        if let Some(header) = headers.get(index) {
            if !header.is_empty() {
                row.insert(header.clone(), value.as_ref().trim().to_string());
            }
        }
    }

    if row.values().all(|v| v.is_empty()) {
        None
    } else {
        Some(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    #[test]
    fn csv_rows_map_trimmed_headers_to_trimmed_cells() {
        let csv = b"name , email\n Grace Hopper , grace@example.com \n";
        let rows = rows_from_csv(csv).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name").map(String::as_str), Some("Grace Hopper"));
        assert_eq!(
            rows[0].get("email").map(String::as_str),
            Some("grace@example.com")
        );
    }

    #[test]
    fn csv_blank_rows_are_skipped() {
        let csv = b"name,email\nGrace,grace@example.com\n,\nAlan,alan@example.com\n,\n";
        let rows = rows_from_csv(csv).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("name").map(String::as_str), Some("Alan"));
    }

    #[test]
    fn csv_short_rows_leave_missing_columns_absent() {
        let csv = b"name,email,position\nGrace,grace@example.com\n";
        let rows = rows_from_csv(csv).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("position"), None);
    }

    #[test]
    fn xlsx_rows_use_first_sheet_header() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "name").unwrap();
        sheet.write_string(0, 1, "email").unwrap();
        sheet.write_string(1, 0, "Grace Hopper").unwrap();
        sheet.write_string(1, 1, "grace@example.com").unwrap();
        // Row 2 left entirely blank, row 3 carries data again.
        sheet.write_string(3, 0, "Alan Turing").unwrap();
        sheet.write_string(3, 1, "alan@example.com").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = rows_from_xlsx(&bytes).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name").map(String::as_str), Some("Grace Hopper"));
        assert_eq!(rows[1].get("email").map(String::as_str), Some("alan@example.com"));
    }

    #[test]
    fn xlsx_garbage_bytes_are_rejected() {
        let result = rows_from_xlsx(b"definitely not a zip archive");
        assert!(matches!(result, Err(RowSourceError::Excel(_))));
    }
}
