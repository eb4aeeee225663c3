use crate::error::ApiError;
use crate::export::{self, FileDownload};
use crate::import::{ImportOutcome, ImportPipeline, RawRow, rows_from_csv, rows_from_xlsx};
use crate::models::ApiResponse;
use crate::notify::Notifier;
use crate::store::EmployeeStore;
use rocket::State;
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::ContentType;
use rocket::serde::json::Json;
use rocket_db_pools::sqlx::PgPool;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const CSV_TEMPLATE_FILE: &str = "employee_import_template.csv";
const XLSX_TEMPLATE_FILE: &str = "employee_import_template.xlsx";

const ALLOWED_CSV_TYPES: [&str; 4] = [
    "text/csv",
    "application/csv",
    "text/plain",
    "application/vnd.ms-excel",
];

const ALLOWED_XLSX_TYPES: [&str; 3] = [
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "application/octet-stream",
];

/// Multipart payload for the import endpoints; the part is named `file`.
#[derive(FromForm)]
pub struct ImportUpload<'f> {
    pub file: Option<TempFile<'f>>,
}

/// Import employees from an uploaded CSV file.
#[post("/employees/import/csv", data = "<upload>")]
pub async fn import_csv(
    upload: Form<ImportUpload<'_>>,
    pool: &State<PgPool>,
    notifier: &State<Notifier>,
) -> Result<Json<ApiResponse<ImportOutcome>>, ApiError> {
    let bytes = extract_upload(upload, &ALLOWED_CSV_TYPES, "CSV").await?;

    let rows = rows_from_csv(&bytes)
        .map_err(|e| ApiError::BadRequest(format!("Could not parse CSV file: {}", e)))?;

    run_import(rows, pool, notifier).await
}

/// Import employees from an uploaded Excel workbook.
#[post("/employees/import/excel", data = "<upload>")]
pub async fn import_excel(
    upload: Form<ImportUpload<'_>>,
    pool: &State<PgPool>,
    notifier: &State<Notifier>,
) -> Result<Json<ApiResponse<ImportOutcome>>, ApiError> {
    let bytes = extract_upload(upload, &ALLOWED_XLSX_TYPES, "Excel").await?;

    let rows = rows_from_xlsx(&bytes)
        .map_err(|e| ApiError::BadRequest(format!("Could not parse Excel file: {}", e)))?;

    run_import(rows, pool, notifier).await
}

/// Download the CSV import template.
#[get("/employees/template/csv")]
pub async fn template_csv() -> Result<FileDownload, ApiError> {
    serve_template(CSV_TEMPLATE_FILE, ContentType::CSV).await
}

/// Download the Excel import template.
#[get("/employees/template/excel")]
pub async fn template_excel() -> Result<FileDownload, ApiError> {
    serve_template(XLSX_TEMPLATE_FILE, export::xlsx_content_type()).await
}

/// Validate the multipart upload and read its contents into memory.
async fn extract_upload(
    upload: Form<ImportUpload<'_>>,
    allowed_types: &[&str],
    label: &str,
) -> Result<Vec<u8>, ApiError> {
    let mut upload = upload.into_inner();
    let file = upload
        .file
        .as_mut()
        .ok_or_else(|| ApiError::BadRequest("Missing file field 'file'".to_string()))?;

    ensure_upload_type(file, allowed_types, label)?;

    if file.len() == 0 {
        return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
    }

    read_upload(file).await
}

/// Reject uploads whose declared content type does not fit the endpoint.
/// Uploads without a declared type pass through to the parser, which is the
/// real arbiter of whether the bytes make sense.
fn ensure_upload_type(
    file: &TempFile<'_>,
    allowed: &[&str],
    label: &str,
) -> Result<(), ApiError> {
    let Some(content_type) = file.content_type() else {
        return Ok(());
    };

    let declared = content_type.to_string();
    let essence = declared
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if allowed.iter().any(|candidate| essence == *candidate) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Unsupported content type '{}' for {} import",
            essence, label
        )))
    }
}

/// Stage the temp file to a private path and read it back. Rocket may hold
/// small uploads in memory, so `copy_to` is the one uniform way to get at
/// the bytes.
async fn read_upload(file: &mut TempFile<'_>) -> Result<Vec<u8>, ApiError> {
    let staged = std::env::temp_dir().join(format!("roster-upload-{}", Uuid::new_v4()));

    file.copy_to(&staged)
        .await
        .map_err(|e| ApiError::InternalError(format!("Failed to read upload: {}", e)))?;

    let bytes = tokio::fs::read(&staged)
        .await
        .map_err(|e| ApiError::InternalError(format!("Failed to read upload: {}", e)));

    let _ = tokio::fs::remove_file(&staged).await;

    bytes
}

/// Feed extracted rows through the pipeline and dispatch the summary mail.
async fn run_import(
    rows: Vec<RawRow>,
    pool: &State<PgPool>,
    notifier: &State<Notifier>,
) -> Result<Json<ApiResponse<ImportOutcome>>, ApiError> {
    if rows.is_empty() {
        return Err(ApiError::BadRequest(
            "File contains no data rows".to_string(),
        ));
    }

    let store = EmployeeStore::new(pool.inner().clone());
    let outcome = ImportPipeline::new(&store).run(rows).await;

    // Summary mail is fire-and-forget; the outcome returns regardless.
    let notifier = notifier.inner().clone();
    let (imported, failed, total) = (outcome.imported, outcome.failed, outcome.total());
    tokio::spawn(async move {
        notifier.send_import_summary(imported, failed, total).await;
    });

    Ok(Json(ApiResponse::ok("Import processed", outcome)))
}

async fn serve_template(
    file_name: &str,
    content_type: ContentType,
) -> Result<FileDownload, ApiError> {
    let path = template_dir().join(file_name);

    let bytes = tokio::fs::read(&path).await.map_err(|_| {
        ApiError::NotFound(format!("Template '{}' not available", file_name))
    })?;

    Ok(FileDownload::new(bytes, file_name.to_string(), content_type))
}

fn template_dir() -> PathBuf {
    std::env::var("TEMPLATE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Path::new("./templates").to_path_buf())
}
