use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failures of the availability engine itself. These all indicate bad input
/// or bad upstream data; the engine never retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AvailabilityError {
    #[error("service duration and slot interval must be positive")]
    InvalidDuration,

    #[error("malformed schedule time: {0}")]
    InvalidScheduleFormat(String),

    #[error("invalid calendar date: {0}")]
    InvalidDate(String),
}

#[derive(Debug, Error)]
pub enum BookingError {
    /// The slot was taken between the availability read and the booking
    /// write. Expected under concurrent load; the caller re-queries.
    #[error("slot is no longer available")]
    SlotNoLongerAvailable,

    #[error("appointment not found")]
    NotFound,

    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error("database error: {0}")]
    Database(String),
}

impl From<diesel::result::Error> for BookingError {
    fn from(err: diesel::result::Error) -> Self {
        BookingError::Database(err.to_string())
    }
}

impl IntoResponse for AvailabilityError {
    fn into_response(self) -> Response {
        error_response(StatusCode::BAD_REQUEST, &self.to_string())
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = match self {
            BookingError::SlotNoLongerAvailable => StatusCode::CONFLICT,
            BookingError::NotFound => StatusCode::NOT_FOUND,
            BookingError::Availability(_) => StatusCode::BAD_REQUEST,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error_response(status, &self.to_string())
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
