//! HTTP route handlers grouped by concern.
//!
//! `employees` covers the CRUD surface, `import`/`export` the file
//! endpoints, and `health` the readiness probe. Handlers return
//! `Result<_, ApiError>` so error rendering stays in one place.

pub mod employees;
pub mod export;
pub mod health;
pub mod import;
