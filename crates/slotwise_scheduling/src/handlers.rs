// --- File: crates/slotwise_scheduling/src/handlers.rs ---
//! HTTP handlers for the scheduling API.
//!
//! Handlers stay thin: sample the clock, hand the payload to the operation
//! modules, let `SchedulingError` render failures. Interviewer identity
//! arrives as the `x-interviewer-email` header set by the fronting identity
//! layer; the `AuthenticatedInterviewer` extractor resolves it against the
//! registry before a handler body runs.

use crate::admin::{
    booked_interviews, dashboard, import_students, interviewer_summaries, register_interviewer,
    student_records, BookedInterview, DashboardResponse, ImportOutcome, ImportStudentsRequest,
    InterviewerSummary, RegisterInterviewerRequest, RegisteredInterviewer, StudentRecord,
};
use crate::availability::{
    declare_future, declare_today, delete_range, list_consolidated, public_availability,
    replace_days, DayAvailability, DeclareRequest, DeleteRangeQuery, DeletedResponse, PublicSlot,
    ReplaceRequest, SlotsCreatedResponse,
};
use crate::booking::{book, BookingConfirmation, BookingRequest};
use crate::eligibility::{check_eligibility, EligibilityRequest, EligibilityResponse};
use crate::error::SchedulingError;
use axum::{
    extract::{FromRequestParts, Query, State},
    http::{request::Parts, StatusCode},
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use slotwise_common::{BoxedError, CalendarNotifier};
use slotwise_config::AppConfig;
use slotwise_db::{
    Interviewer, InterviewerRepository, SqlBookingRepository, SqlInterviewerRepository,
    SqlRosterRepository, SqlSlotRepository,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Request header carrying the interviewer identity.
pub const INTERVIEWER_HEADER: &str = "x-interviewer-email";

// Shared state for all scheduling routes
#[derive(Clone)]
pub struct SchedulingState {
    pub slots: SqlSlotRepository,
    pub bookings: SqlBookingRepository,
    pub roster: SqlRosterRepository,
    pub interviewers: SqlInterviewerRepository,
    pub config: Arc<AppConfig>,
    pub notifier: Option<Arc<dyn CalendarNotifier<Error = BoxedError>>>,
}

/// The registered interviewer named by the identity header.
///
/// Rejects with 401 when the header is absent and 403 when the email does
/// not resolve to a registered interviewer.
pub struct AuthenticatedInterviewer(pub Interviewer);

impl FromRequestParts<Arc<SchedulingState>> for AuthenticatedInterviewer {
    type Rejection = SchedulingError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<SchedulingState>,
    ) -> Result<Self, Self::Rejection> {
        let email = parts
            .headers
            .get(INTERVIEWER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty())
            .ok_or(SchedulingError::MissingIdentity)?;
        let interviewer = state
            .interviewers
            .find_by_email(&email)
            .await?
            .ok_or(SchedulingError::UnknownInterviewer)?;
        Ok(AuthenticatedInterviewer(interviewer))
    }
}

/// Query string for the public availability listing.
#[derive(Debug, Deserialize)]
pub struct PublicSlotsQuery {
    pub phone: Option<String>,
}

/// Handler to declare future availability ranges.
#[axum::debug_handler]
pub async fn declare_slots_handler(
    State(state): State<Arc<SchedulingState>>,
    AuthenticatedInterviewer(interviewer): AuthenticatedInterviewer,
    Json(payload): Json<DeclareRequest>,
) -> Result<(StatusCode, Json<SlotsCreatedResponse>), SchedulingError> {
    let created = declare_future(
        &state.slots,
        &state.config,
        &interviewer.email,
        &payload,
        Utc::now(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler to declare availability for the current date only.
#[axum::debug_handler]
pub async fn declare_today_handler(
    State(state): State<Arc<SchedulingState>>,
    AuthenticatedInterviewer(interviewer): AuthenticatedInterviewer,
    Json(payload): Json<DeclareRequest>,
) -> Result<(StatusCode, Json<SlotsCreatedResponse>), SchedulingError> {
    let created = declare_today(
        &state.slots,
        &state.config,
        &interviewer.email,
        &payload,
        Utc::now(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler to replace availability for whole days.
#[axum::debug_handler]
pub async fn replace_slots_handler(
    State(state): State<Arc<SchedulingState>>,
    AuthenticatedInterviewer(interviewer): AuthenticatedInterviewer,
    Json(payload): Json<ReplaceRequest>,
) -> Result<Json<SlotsCreatedResponse>, SchedulingError> {
    let created = replace_days(
        &state.slots,
        &state.config,
        &interviewer.email,
        &payload,
        Utc::now(),
    )
    .await?;
    Ok(Json(created))
}

/// Handler to delete unbooked slots within an instant range.
#[axum::debug_handler]
pub async fn delete_slots_handler(
    State(state): State<Arc<SchedulingState>>,
    AuthenticatedInterviewer(interviewer): AuthenticatedInterviewer,
    Query(query): Query<DeleteRangeQuery>,
) -> Result<Json<DeletedResponse>, SchedulingError> {
    let deleted = delete_range(&state.slots, &interviewer.email, &query).await?;
    Ok(Json(deleted))
}

/// Handler to list the caller's own open slots, consolidated per day.
#[axum::debug_handler]
pub async fn list_slots_handler(
    State(state): State<Arc<SchedulingState>>,
    AuthenticatedInterviewer(interviewer): AuthenticatedInterviewer,
) -> Result<Json<Vec<DayAvailability>>, SchedulingError> {
    let days = list_consolidated(&state.slots, &state.config, &interviewer.email, Utc::now())
        .await?;
    Ok(Json(days))
}

/// Handler for the public availability listing, grouped by date.
#[axum::debug_handler]
pub async fn public_availability_handler(
    State(state): State<Arc<SchedulingState>>,
    Query(query): Query<PublicSlotsQuery>,
) -> Result<Json<BTreeMap<String, Vec<PublicSlot>>>, SchedulingError> {
    let grouped = public_availability(
        &state.slots,
        &state.roster,
        &state.config,
        query.phone.as_deref(),
        Utc::now(),
    )
    .await?;
    Ok(Json(grouped))
}

/// Handler for the roster eligibility pre-check.
#[axum::debug_handler]
pub async fn eligibility_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(payload): Json<EligibilityRequest>,
) -> Result<Json<EligibilityResponse>, SchedulingError> {
    let response = check_eligibility(&state.roster, &payload).await?;
    Ok(Json(response))
}

/// Handler to book an interview slot.
#[axum::debug_handler]
pub async fn create_booking_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(payload): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingConfirmation>), SchedulingError> {
    let confirmation = book(
        &state.slots,
        &state.bookings,
        &state.roster,
        &state.interviewers,
        state.notifier.as_deref(),
        &state.config,
        &payload,
        Utc::now(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}

/// Handler for the admin dashboard aggregates.
#[axum::debug_handler]
pub async fn dashboard_handler(
    State(state): State<Arc<SchedulingState>>,
) -> Result<Json<DashboardResponse>, SchedulingError> {
    let response = dashboard(
        &state.slots,
        &state.bookings,
        &state.roster,
        &state.interviewers,
        &state.config,
        Utc::now(),
    )
    .await?;
    Ok(Json(response))
}

/// Handler for the per-interviewer admin summaries.
#[axum::debug_handler]
pub async fn interviewer_summaries_handler(
    State(state): State<Arc<SchedulingState>>,
) -> Result<Json<Vec<InterviewerSummary>>, SchedulingError> {
    let summaries = interviewer_summaries(
        &state.slots,
        &state.bookings,
        &state.interviewers,
        &state.config,
        Utc::now(),
    )
    .await?;
    Ok(Json(summaries))
}

/// Handler for the admin roster listing with booking flags.
#[axum::debug_handler]
pub async fn student_records_handler(
    State(state): State<Arc<SchedulingState>>,
) -> Result<Json<Vec<StudentRecord>>, SchedulingError> {
    let records = student_records(&state.roster, &state.bookings).await?;
    Ok(Json(records))
}

/// Handler for the booked-interviews report.
#[axum::debug_handler]
pub async fn booked_interviews_handler(
    State(state): State<Arc<SchedulingState>>,
) -> Result<Json<Vec<BookedInterview>>, SchedulingError> {
    let report = booked_interviews(
        &state.bookings,
        &state.roster,
        &state.interviewers,
        &state.config,
    )
    .await?;
    Ok(Json(report))
}

/// Handler for the bulk roster import.
#[axum::debug_handler]
pub async fn import_students_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(payload): Json<ImportStudentsRequest>,
) -> Result<Json<ImportOutcome>, SchedulingError> {
    let outcome = import_students(&state.roster, &payload).await?;
    Ok(Json(outcome))
}

/// Handler to register or update an interviewer.
#[axum::debug_handler]
pub async fn register_interviewer_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(payload): Json<RegisterInterviewerRequest>,
) -> Result<Json<RegisteredInterviewer>, SchedulingError> {
    let registered = register_interviewer(&state.interviewers, &payload).await?;
    Ok(Json(registered))
}
