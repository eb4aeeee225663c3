//! Export rendering for the roster.
//!
//! Renders stored employees into downloadable CSV or Excel bytes and
//! provides the attachment responder used by the download routes.

use crate::models::Employee;
use chrono::Utc;
use rocket::http::ContentType;
use rocket::response::{self, Responder};
use rocket::{Request, Response};
use rust_xlsxwriter::Workbook;
use std::io::Cursor;
use thiserror::Error;

/// Column order shared by the export files; the import template uses the
/// same order minus `id`.
pub const EXPORT_HEADERS: [&str; 7] = [
    "id",
    "name",
    "email",
    "phoneNumber",
    "address",
    "dateOfBirth",
    "position",
];

pub const XLSX_MIME_SUBTYPE: &str = "vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("workbook write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Content type for `.xlsx` downloads.
pub fn xlsx_content_type() -> ContentType {
    ContentType::new("application", XLSX_MIME_SUBTYPE)
}

/// Timestamped attachment name, e.g. `employees_export_20260804_101500.csv`.
pub fn export_filename(extension: &str) -> String {
    format!(
        "employees_export_{}.{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        extension
    )
}

pub fn render_csv(employees: &[Employee]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS)?;

    for employee in employees {
        writer.write_record([
            employee.id.to_string(),
            employee.name.clone(),
            employee.email.clone(),
            optional_text(&employee.phone_number),
            optional_text(&employee.address),
            employee
                .date_of_birth
                .map(|d| d.to_string())
                .unwrap_or_default(),
            optional_text(&employee.position),
        ])?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(std::io::Error::other(e.to_string())))
}

pub fn render_xlsx(employees: &[Employee]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Employees")?;

    for (column, header) in EXPORT_HEADERS.iter().enumerate() {
        sheet.write_string(0, column as u16, *header)?;
    }

    for (index, employee) in employees.iter().enumerate() {
        let row = (index + 1) as u32;
        sheet.write_number(row, 0, employee.id as f64)?;
        sheet.write_string(row, 1, &employee.name)?;
        sheet.write_string(row, 2, &employee.email)?;
        sheet.write_string(row, 3, optional_text(&employee.phone_number))?;
        sheet.write_string(row, 4, optional_text(&employee.address))?;
        sheet.write_string(
            row,
            5,
            employee
                .date_of_birth
                .map(|d| d.to_string())
                .unwrap_or_default(),
        )?;
        sheet.write_string(row, 6, optional_text(&employee.position))?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn optional_text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Attachment responder: sets the content type and a `Content-Disposition`
/// header carrying the download filename.
pub struct FileDownload {
    bytes: Vec<u8>,
    filename: String,
    content_type: ContentType,
}

impl FileDownload {
    pub fn new(bytes: Vec<u8>, filename: String, content_type: ContentType) -> Self {
        Self {
            bytes,
            filename,
            content_type,
        }
    }
}

impl<'r> Responder<'r, 'static> for FileDownload {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(self.content_type)
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            )
            .sized_body(self.bytes.len(), Cursor::new(self.bytes))
            .ok()
    }
}
