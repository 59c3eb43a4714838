use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        tracing::error!("Error: {}: {}", status, message);

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Domain error taxonomy of the booking engine. Every variant carries enough
/// structure (kind + offending id) for the caller to decide whether to show
/// the user a message or retry. The core never retries on its own.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("Slot overlaps existing slot {conflicting} for doctor {doctor_id}")]
    OverlappingSlot { doctor_id: Uuid, conflicting: Uuid },

    #[error("Slot not found: {0}")]
    SlotNotFound(Uuid),

    #[error("Slot {0} has an active booking")]
    SlotBooked(Uuid),

    #[error("Slot {0} is already booked")]
    SlotAlreadyBooked(Uuid),

    #[error("Appointment not found: {0}")]
    AppointmentNotFound(Uuid),

    #[error("Illegal status transition from {from} to {to}")]
    IllegalTransition { from: String, to: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match &err {
            BookingError::InvalidTimeRange(_) => AppError::BadRequest(err.to_string()),
            BookingError::OverlappingSlot { .. } => AppError::Conflict(err.to_string()),
            BookingError::SlotNotFound(_) => AppError::NotFound(err.to_string()),
            BookingError::SlotBooked(_) => AppError::Conflict(err.to_string()),
            BookingError::SlotAlreadyBooked(_) => AppError::Conflict(err.to_string()),
            BookingError::AppointmentNotFound(_) => AppError::NotFound(err.to_string()),
            BookingError::IllegalTransition { .. } => AppError::Conflict(err.to_string()),
            BookingError::Forbidden(_) => AppError::Forbidden(err.to_string()),
            BookingError::Storage(_) => AppError::Internal(err.to_string()),
        }
    }
}
