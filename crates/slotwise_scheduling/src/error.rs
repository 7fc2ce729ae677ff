// --- File: crates/slotwise_scheduling/src/error.rs ---
//! Error type for the scheduling surface.
//!
//! Every failure names the precondition it violated so the caller can react
//! without parsing prose. The HTTP rendering is a JSON body with a stable
//! `error` discriminant; `AlreadyBooked` additionally carries enough of the
//! prior booking to explain the rejection to the student.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::DateTime;
use serde::Serialize;
use slotwise_common::HttpStatusCode;
use slotwise_db::{Booking, DbError};
use thiserror::Error;
use tracing::error;

/// Errors produced by availability, eligibility and booking operations.
#[derive(Error, Debug)]
pub enum SchedulingError {
    /// Malformed or missing input. Never retried.
    #[error("{0}")]
    Validation(String),

    /// The phone number does not resolve to a roster student.
    #[error("student not found in roster")]
    NotAuthorized,

    /// The student's department has no registered interviewers.
    #[error("no interviewers available for department '{0}'")]
    NoInterviewersAvailable(String),

    /// The student already holds a booking; carries it for display.
    #[error("a booking already exists for this student")]
    AlreadyBooked { existing: Box<Booking> },

    /// No unbooked slot remains at the requested start instant.
    #[error("the requested time slot is no longer available")]
    SlotUnavailable,

    /// Nothing matched the request, distinct from a malformed request.
    #[error("{0}")]
    NotFound(String),

    /// The interviewer identity header is missing from the request.
    #[error("interviewer identity is required")]
    MissingIdentity,

    /// The identity header named an interviewer that is not registered.
    #[error("interviewer is not registered")]
    UnknownInterviewer,

    /// A storage operation failed.
    #[error("database error: {0}")]
    Database(#[from] DbError),

    /// Anything else that should never happen.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SchedulingError {
    /// Stable machine-readable discriminant used in the JSON error body.
    pub fn kind(&self) -> &'static str {
        match self {
            SchedulingError::Validation(_) => "validation_error",
            SchedulingError::NotAuthorized => "not_authorized",
            SchedulingError::NoInterviewersAvailable(_) => "no_interviewers_available",
            SchedulingError::AlreadyBooked { .. } => "already_booked",
            SchedulingError::SlotUnavailable => "slot_unavailable",
            SchedulingError::NotFound(_) => "not_found",
            SchedulingError::MissingIdentity => "missing_identity",
            SchedulingError::UnknownInterviewer => "unknown_interviewer",
            SchedulingError::Database(_) => "internal_error",
            SchedulingError::Internal(_) => "internal_error",
        }
    }
}

impl HttpStatusCode for SchedulingError {
    fn status_code(&self) -> u16 {
        match self {
            SchedulingError::Validation(_) => 400,
            SchedulingError::NotAuthorized => 403,
            SchedulingError::NoInterviewersAvailable(_) => 409,
            SchedulingError::AlreadyBooked { .. } => 409,
            SchedulingError::SlotUnavailable => 409,
            SchedulingError::NotFound(_) => 404,
            SchedulingError::MissingIdentity => 401,
            SchedulingError::UnknownInterviewer => 403,
            SchedulingError::Database(_) => 500,
            SchedulingError::Internal(_) => 500,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    existing_booking: Option<PriorBooking>,
}

/// The subset of an existing booking shown to a student who tries to book
/// twice. Instants are rendered as UTC RFC3339.
#[derive(Serialize)]
struct PriorBooking {
    interviewer_email: String,
    start_time: String,
    end_time: String,
    meeting_link: Option<String>,
}

impl From<&Booking> for PriorBooking {
    fn from(booking: &Booking) -> Self {
        let render = |ms: i64| {
            DateTime::from_timestamp_millis(ms)
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_default()
        };
        PriorBooking {
            interviewer_email: booking.interviewer_email.clone(),
            start_time: render(booking.start_ms),
            end_time: render(booking.end_ms),
            meeting_link: booking.meeting_link.clone(),
        }
    }
}

impl IntoResponse for SchedulingError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let existing_booking = match &self {
            SchedulingError::AlreadyBooked { existing } => Some(PriorBooking::from(&**existing)),
            _ => None,
        };

        // 5xx detail stays in the server log; the caller gets a generic line.
        let message = if status.is_server_error() {
            "an unexpected error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = Json(ErrorBody {
            error: self.kind(),
            message,
            existing_booking,
        });
        (status, body).into_response()
    }
}
