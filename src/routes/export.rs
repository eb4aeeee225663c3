use crate::error::ApiError;
use crate::export::{self, FileDownload};
use crate::store::EmployeeStore;
use rocket::State;
use rocket::http::ContentType;
use rocket_db_pools::sqlx::PgPool;

/// Download the full roster as a CSV attachment.
#[get("/employees/export/csv")]
pub async fn export_csv(pool: &State<PgPool>) -> Result<FileDownload, ApiError> {
    let store = EmployeeStore::new(pool.inner().clone());
    let employees = store.find_all(None).await?;

    let bytes = export::render_csv(&employees)
        .map_err(|e| ApiError::InternalError(format!("Failed to render CSV export: {}", e)))?;

    log::info!("exported {} employees as CSV", employees.len());

    Ok(FileDownload::new(
        bytes,
        export::export_filename("csv"),
        ContentType::CSV,
    ))
}

/// Download the full roster as an Excel workbook.
#[get("/employees/export/excel")]
pub async fn export_excel(pool: &State<PgPool>) -> Result<FileDownload, ApiError> {
    let store = EmployeeStore::new(pool.inner().clone());
    let employees = store.find_all(None).await?;

    let bytes = export::render_xlsx(&employees)
        .map_err(|e| ApiError::InternalError(format!("Failed to render Excel export: {}", e)))?;

    log::info!("exported {} employees as Excel", employees.len());

    Ok(FileDownload::new(
        bytes,
        export::export_filename("xlsx"),
        export::xlsx_content_type(),
    ))
}
