use chrono::{DateTime, NaiveDate, Utc};
use rocket::http::Status;
use rocket_db_pools::sqlx::FromRow;
use serde::{Deserialize, Serialize};

// ===== Employee Models =====

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub position: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Candidate for a new employee record, either deserialized from a create
/// request or produced by the import validator from a raw row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    /// Defaulted so an absent field surfaces as a validation error rather
    /// than a deserialization failure.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub position: Option<String>,
}

impl NewEmployee {
    /// Trim all fields and coerce blank optional strings to `None`.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
        self.phone_number = normalize_optional(self.phone_number);
        self.address = normalize_optional(self.address);
        self.position = normalize_optional(self.position);
        self
    }
}

/// Partial update payload. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployee {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub position: Option<String>,
}

impl UpdateEmployee {
    /// Trim supplied fields and coerce blank optional strings to `None`.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.map(|v| v.trim().to_string());
        self.email = self.email.map(|v| v.trim().to_string());
        self.phone_number = normalize_optional(self.phone_number);
        self.address = normalize_optional(self.address);
        self.position = normalize_optional(self.position);
        self
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ===== Response Envelope =====

/// Standard response envelope wrapping every employee endpoint payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub response_code: u16,
    pub response_desc: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn with_status(status: Status, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            response_code: status.code,
            response_desc: status.reason_lossy().to_string(),
            message: message.into(),
            data,
        }
    }

    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::with_status(Status::Ok, message, Some(data))
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::with_status(Status::Created, message, Some(data))
    }
}

/// Payload for the record count endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    pub total: i64,
}
