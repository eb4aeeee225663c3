//! Lightweight service health endpoint used for readiness checks and tests.

use chrono::{DateTime, Utc};
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};

/// Basic response payload describing API health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Static status string reporting application readiness.
    pub status: String,
    /// Server-side time at which the check ran.
    pub timestamp: DateTime<Utc>,
}

/// Health check endpoint returning a trivial JSON payload.
#[get("/health")]
pub fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
    })
}
