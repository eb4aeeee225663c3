//! Employee record store.
//!
//! The only component that mutates persisted state. HTTP handlers, the
//! import pipeline, and the reminder scheduler all go through this type, so
//! the SQL for the roster lives in one place.

use crate::models::{Employee, NewEmployee, UpdateEmployee};
use rocket_db_pools::sqlx::{self, PgPool, migrate::Migrator};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations.
///
/// Idempotent: migrations that have already been applied are skipped. Called
/// from the ignite fairing before the server starts accepting traffic.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    log::info!("checking database migration state");
    MIGRATOR.run(pool).await?;
    log::info!("database migrations up to date");
    Ok(())
}

#[derive(Clone)]
pub struct EmployeeStore {
    pool: PgPool,
}

impl EmployeeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List employees, optionally filtered by a case-insensitive substring
    /// of the name. Results are ordered by id (creation order).
    pub async fn find_all(&self, name_filter: Option<&str>) -> Result<Vec<Employee>, sqlx::Error> {
        match name_filter.map(str::trim).filter(|s| !s.is_empty()) {
            Some(fragment) => {
                sqlx::query_as(
                    r#"SELECT id, name, email, phone_number, address, date_of_birth, position, created_at, updated_at
                       FROM employees
                       WHERE name ILIKE '%' || $1 || '%'
                       ORDER BY id"#,
                )
                .bind(fragment)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(
                    r#"SELECT id, name, email, phone_number, address, date_of_birth, position, created_at, updated_at
                       FROM employees
                       ORDER BY id"#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, sqlx::Error> {
        sqlx::query_as(
            r#"SELECT id, name, email, phone_number, address, date_of_birth, position, created_at, updated_at
               FROM employees
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, sqlx::Error> {
        sqlx::query_as(
            r#"SELECT id, name, email, phone_number, address, date_of_birth, position, created_at, updated_at
               FROM employees
               WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn insert(&self, candidate: &NewEmployee) -> Result<Employee, sqlx::Error> {
        sqlx::query_as(
            r#"INSERT INTO employees (name, email, phone_number, address, date_of_birth, position)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id, name, email, phone_number, address, date_of_birth, position, created_at, updated_at"#,
        )
        .bind(&candidate.name)
        .bind(&candidate.email)
        .bind(&candidate.phone_number)
        .bind(&candidate.address)
        .bind(candidate.date_of_birth)
        .bind(&candidate.position)
        .fetch_one(&self.pool)
        .await
    }

    /// Partial update: only supplied fields change. Returns `None` when no
    /// employee with the given id exists.
    pub async fn update(
        &self,
        id: i32,
        changes: &UpdateEmployee,
    ) -> Result<Option<Employee>, sqlx::Error> {
        sqlx::query_as(
            r#"UPDATE employees SET
                   name = COALESCE($2, name),
                   email = COALESCE($3, email),
                   phone_number = COALESCE($4, phone_number),
                   address = COALESCE($5, address),
                   date_of_birth = COALESCE($6, date_of_birth),
                   position = COALESCE($7, position),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING id, name, email, phone_number, address, date_of_birth, position, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.phone_number)
        .bind(&changes.address)
        .bind(changes.date_of_birth)
        .bind(&changes.position)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete by id. Returns whether a row was removed; deleting a missing
    /// id is a no-op reported as `false`.
    pub async fn delete(&self, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await
    }

    /// Employees whose date of birth falls on the given month/day, for the
    /// reminder scheduler.
    pub async fn find_birthdays(&self, month: u32, day: u32) -> Result<Vec<Employee>, sqlx::Error> {
        sqlx::query_as(
            r#"SELECT id, name, email, phone_number, address, date_of_birth, position, created_at, updated_at
               FROM employees
               WHERE date_of_birth IS NOT NULL
                 AND EXTRACT(MONTH FROM date_of_birth)::int = $1
                 AND EXTRACT(DAY FROM date_of_birth)::int = $2
               ORDER BY name"#,
        )
        .bind(month as i32)
        .bind(day as i32)
        .fetch_all(&self.pool)
        .await
    }
}
