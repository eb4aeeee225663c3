use crate::error::ApiError;
use crate::import::validator;
use crate::models::{ApiResponse, CountResponse, Employee, NewEmployee, UpdateEmployee};
use crate::notify::Notifier;
use crate::store::EmployeeStore;
use rocket::State;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket_db_pools::sqlx::PgPool;

/// List employees, optionally filtered by a case-insensitive name substring.
#[get("/employees?<name>")]
pub async fn list_employees(
    name: Option<String>,
    pool: &State<PgPool>,
) -> Result<Json<ApiResponse<Vec<Employee>>>, ApiError> {
    let store = EmployeeStore::new(pool.inner().clone());
    let employees = store.find_all(name.as_deref()).await?;

    Ok(Json(ApiResponse::ok("Employees retrieved", employees)))
}

/// Total number of employee records.
#[get("/employees/count")]
pub async fn count_employees(
    pool: &State<PgPool>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let store = EmployeeStore::new(pool.inner().clone());
    let total = store.count().await?;

    Ok(Json(ApiResponse::ok(
        "Employee count retrieved",
        CountResponse { total },
    )))
}

/// Get a single employee by id.
#[get("/employees/<id>")]
pub async fn get_employee(
    id: i32,
    pool: &State<PgPool>,
) -> Result<Json<ApiResponse<Employee>>, ApiError> {
    let store = EmployeeStore::new(pool.inner().clone());

    match store.find_by_id(id).await? {
        Some(employee) => Ok(Json(ApiResponse::ok("Employee retrieved", employee))),
        None => Err(ApiError::NotFound(format!("Employee {} not found", id))),
    }
}

/// Create a single employee record.
#[post("/employees", data = "<payload>")]
pub async fn create_employee(
    payload: Json<NewEmployee>,
    pool: &State<PgPool>,
    notifier: &State<Notifier>,
) -> Result<status::Custom<Json<ApiResponse<Employee>>>, ApiError> {
    let candidate = payload.into_inner().normalized();

    if candidate.name.is_empty() || candidate.email.is_empty() {
        return Err(ApiError::BadRequest(
            validator::MISSING_REQUIRED_REASON.to_string(),
        ));
    }

    let violations = validator::field_violations(&candidate);
    if !violations.is_empty() {
        return Err(ApiError::BadRequest(violations.join("; ")));
    }

    let store = EmployeeStore::new(pool.inner().clone());

    if store.find_by_email(&candidate.email).await?.is_some() {
        return Err(ApiError::BadRequest(
            validator::DUPLICATE_EMAIL_REASON.to_string(),
        ));
    }

    let employee = store.insert(&candidate).await?;
    log::info!("created employee {} ({})", employee.id, employee.email);

    // Welcome mail is fire-and-forget: the response never waits on it.
    let notifier = notifier.inner().clone();
    let (to, who) = (employee.email.clone(), employee.name.clone());
    tokio::spawn(async move { notifier.send_welcome(&to, &who).await });

    Ok(status::Custom(
        Status::Created,
        Json(ApiResponse::created("Employee created", employee)),
    ))
}

/// Partially update an employee; only supplied fields change.
#[put("/employees/<id>", data = "<payload>")]
pub async fn update_employee(
    id: i32,
    payload: Json<UpdateEmployee>,
    pool: &State<PgPool>,
) -> Result<Json<ApiResponse<Employee>>, ApiError> {
    let changes = payload.into_inner().normalized();

    let violations = validator::update_violations(&changes);
    if !violations.is_empty() {
        return Err(ApiError::BadRequest(violations.join("; ")));
    }

    let store = EmployeeStore::new(pool.inner().clone());

    if let Some(email) = &changes.email {
        if let Some(existing) = store.find_by_email(email).await? {
            if existing.id != id {
                return Err(ApiError::BadRequest(
                    validator::DUPLICATE_EMAIL_REASON.to_string(),
                ));
            }
        }
    }

    match store.update(id, &changes).await? {
        Some(employee) => {
            log::info!("updated employee {}", employee.id);
            Ok(Json(ApiResponse::ok("Employee updated", employee)))
        }
        None => Err(ApiError::NotFound(format!("Employee {} not found", id))),
    }
}

/// Delete an employee record permanently.
#[delete("/employees/<id>")]
pub async fn delete_employee(
    id: i32,
    pool: &State<PgPool>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let store = EmployeeStore::new(pool.inner().clone());

    if store.delete(id).await? {
        log::info!("deleted employee {}", id);
        Ok(Json(ApiResponse::with_status(
            Status::Ok,
            "Employee deleted",
            None,
        )))
    } else {
        Err(ApiError::NotFound(format!("Employee {} not found", id)))
    }
}
