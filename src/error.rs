use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::{Request, Response};
use rocket_db_pools::sqlx;
use serde::Serialize;
use std::io::Cursor;

/// Errors surfaced by HTTP handlers.
///
/// Row-level import failures are never represented here; they are reported
/// inside the import outcome. Only batch-wide problems (bad request shape,
/// unreadable file, store failure) become an `ApiError`.
#[derive(Debug)]
pub enum ApiError {
    DatabaseError(sqlx::Error),
    NotFound(String),
    BadRequest(String),
    InternalError(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorEnvelope {
    response_code: u16,
    response_desc: String,
    message: String,
    data: Option<()>,
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let (status, message) = match self {
            ApiError::DatabaseError(e) => {
                log::error!("database error: {}", e);
                (Status::InternalServerError, e.to_string())
            }
            ApiError::NotFound(msg) => {
                log::debug!("not found: {}", msg);
                (Status::NotFound, msg)
            }
            ApiError::BadRequest(msg) => {
                log::debug!("bad request: {}", msg);
                (Status::BadRequest, msg)
            }
            ApiError::InternalError(msg) => {
                log::error!("internal error: {}", msg);
                (Status::InternalServerError, msg)
            }
        };

        let envelope = ErrorEnvelope {
            response_code: status.code,
            response_desc: status.reason_lossy().to_string(),
            message,
            data: None,
        };

        let json = serde_json::to_string(&envelope).unwrap_or_else(|_| {
            r#"{"responseCode":500,"responseDesc":"Internal Server Error","message":"Failed to serialize error","data":null}"#.to_string()
        });

        Response::build()
            .status(status)
            .header(rocket::http::ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            _ => ApiError::DatabaseError(err),
        }
    }
}
