// File: crates/slotwise_scheduling/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::admin::{
    BookedInterview, DailyCount, DashboardResponse, DashboardTotals, ImportOutcome, ImportStudent,
    ImportStudentsRequest, InterviewerSummary, RegisterInterviewerRequest, RegisteredInterviewer,
    SkippedStudent, StudentRecord,
};
use crate::availability::{
    AvailabilityRange, DayAvailability, DeclareRequest, DeletedResponse, PublicSlot,
    ReplaceRequest, SlotsCreatedResponse, TimeRange,
};
use crate::booking::{BookingConfirmation, BookingRequest, BookingView, NotificationStatus};
use crate::eligibility::{EligibilityRequest, EligibilityResponse};

#[utoipa::path(
    post,
    path = "/scheduling/slots/batch",
    request_body(content = DeclareRequest, example = json!({
        "ranges": [
            { "date": "2026-03-02", "start_time": "09:00", "end_time": "12:00" }
        ]
    })),
    responses(
        (status = 201, description = "Slots created (idempotent on re-declaration)", body = SlotsCreatedResponse),
        (status = 400, description = "Malformed date or no bookable slots in the declared ranges"),
        (status = 401, description = "Missing interviewer identity header"),
        (status = 403, description = "Interviewer is not registered")
    ),
    tag = "Availability"
)]
fn doc_declare_slots_handler() {}

#[utoipa::path(
    post,
    path = "/scheduling/slots/today",
    request_body = DeclareRequest,
    responses(
        (status = 201, description = "Slots created for the current date", body = SlotsCreatedResponse),
        (status = 400, description = "Date is not today or the whole range has already passed"),
        (status = 401, description = "Missing interviewer identity header"),
        (status = 403, description = "Interviewer is not registered")
    ),
    tag = "Availability"
)]
fn doc_declare_today_handler() {}

#[utoipa::path(
    put,
    path = "/scheduling/slots",
    request_body(content = ReplaceRequest, example = json!({
        "days": [
            { "date": "2026-03-02", "start_time": "14:00", "end_time": "16:00" }
        ]
    })),
    responses(
        (status = 200, description = "Unbooked slots for the named days replaced atomically", body = SlotsCreatedResponse),
        (status = 400, description = "Malformed date or empty day list"),
        (status = 401, description = "Missing interviewer identity header"),
        (status = 403, description = "Interviewer is not registered")
    ),
    tag = "Availability"
)]
fn doc_replace_slots_handler() {}

#[utoipa::path(
    delete,
    path = "/scheduling/slots",
    params(
        ("from" = String, Query, description = "Range start, RFC3339", example = "2026-03-02T09:00:00+05:30"),
        ("to" = String, Query, description = "Range end, RFC3339", example = "2026-03-02T12:00:00+05:30")
    ),
    responses(
        (status = 200, description = "Unbooked slots wholly inside the range deleted", body = DeletedResponse),
        (status = 400, description = "Malformed or inverted bounds"),
        (status = 404, description = "No unbooked slot matched the range")
    ),
    tag = "Availability"
)]
fn doc_delete_slots_handler() {}

#[utoipa::path(
    get,
    path = "/scheduling/slots",
    responses(
        (status = 200, description = "Own open slots grouped per day, consecutive slots consolidated", body = [DayAvailability]),
        (status = 401, description = "Missing interviewer identity header"),
        (status = 403, description = "Interviewer is not registered")
    ),
    tag = "Availability"
)]
fn doc_list_slots_handler() {}

#[utoipa::path(
    get,
    path = "/scheduling/availability",
    params(
        ("phone" = Option<String>, Query, description = "Student phone; required when department affinity is enabled")
    ),
    responses(
        (status = 200, description = "Open slot times grouped by date",
         example = json!({
             "2026-03-02": [
                 { "start_time": "2026-03-02T09:00:00+05:30", "end_time": "2026-03-02T09:30:00+05:30" }
             ]
         })
        ),
        (status = 400, description = "Phone required but missing"),
        (status = 403, description = "Phone does not resolve to a roster student")
    ),
    tag = "Scheduling"
)]
fn doc_public_availability_handler() {}

#[utoipa::path(
    post,
    path = "/scheduling/eligibility",
    request_body(content = EligibilityRequest, example = json!({ "phone": "+91 98765 43210" })),
    responses(
        (status = 200, description = "Whether the phone belongs to a roster student", body = EligibilityResponse),
        (status = 400, description = "Phone has fewer than ten digits")
    ),
    tag = "Scheduling"
)]
fn doc_eligibility_handler() {}

#[utoipa::path(
    post,
    path = "/scheduling/bookings",
    request_body(content = BookingRequest, example = json!({
        "start_time": "2026-03-02T09:00:00+05:30",
        "name": "Priya Sharma",
        "email": "priya@example.com",
        "phone": "+91 98765 43210"
    })),
    responses(
        (status = 201, description = "Booking confirmed; notification may be degraded", body = BookingConfirmation),
        (status = 400, description = "Malformed input or a start time in the past"),
        (status = 403, description = "Phone does not resolve to a roster student"),
        (status = 409, description = "Already booked, slot unavailable, or no interviewers in the department")
    ),
    tag = "Scheduling"
)]
fn doc_create_booking_handler() {}

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    responses(
        (status = 200, description = "Headline totals, booking rate and next-3-day interview counts", body = DashboardResponse)
    ),
    tag = "Admin"
)]
fn doc_dashboard_handler() {}

#[utoipa::path(
    get,
    path = "/admin/interviewers",
    responses(
        (status = 200, description = "Registered interviewers with slot and interview counts", body = [InterviewerSummary])
    ),
    tag = "Admin"
)]
fn doc_interviewer_summaries_handler() {}

#[utoipa::path(
    post,
    path = "/admin/interviewers",
    request_body = RegisterInterviewerRequest,
    responses(
        (status = 200, description = "Interviewer registered or updated in place", body = RegisteredInterviewer),
        (status = 400, description = "Missing name, email or department")
    ),
    tag = "Admin"
)]
fn doc_register_interviewer_handler() {}

#[utoipa::path(
    get,
    path = "/admin/students",
    responses(
        (status = 200, description = "Roster rows flagged with whether the student already booked", body = [StudentRecord])
    ),
    tag = "Admin"
)]
fn doc_student_records_handler() {}

#[utoipa::path(
    post,
    path = "/admin/students/import",
    request_body = ImportStudentsRequest,
    responses(
        (status = 200, description = "Valid rows upserted; invalid rows reported with reasons", body = ImportOutcome),
        (status = 400, description = "Empty student list")
    ),
    tag = "Admin"
)]
fn doc_import_students_handler() {}

#[utoipa::path(
    get,
    path = "/admin/bookings",
    responses(
        (status = 200, description = "Booked interviews joined with roster and interviewer details", body = [BookedInterview])
    ),
    tag = "Admin"
)]
fn doc_booked_interviews_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_declare_slots_handler,
        doc_declare_today_handler,
        doc_replace_slots_handler,
        doc_delete_slots_handler,
        doc_list_slots_handler,
        doc_public_availability_handler,
        doc_eligibility_handler,
        doc_create_booking_handler,
        doc_dashboard_handler,
        doc_interviewer_summaries_handler,
        doc_register_interviewer_handler,
        doc_student_records_handler,
        doc_import_students_handler,
        doc_booked_interviews_handler
    ),
    components(
        schemas(
            AvailabilityRange,
            DeclareRequest,
            ReplaceRequest,
            SlotsCreatedResponse,
            DeletedResponse,
            TimeRange,
            DayAvailability,
            PublicSlot,
            EligibilityRequest,
            EligibilityResponse,
            BookingRequest,
            BookingView,
            BookingConfirmation,
            NotificationStatus,
            DashboardTotals,
            DailyCount,
            DashboardResponse,
            InterviewerSummary,
            StudentRecord,
            BookedInterview,
            ImportStudent,
            ImportStudentsRequest,
            SkippedStudent,
            ImportOutcome,
            RegisterInterviewerRequest,
            RegisteredInterviewer
        )
    ),
    tags(
        (name = "Availability", description = "Interviewer availability management"),
        (name = "Scheduling", description = "Student-facing availability and booking"),
        (name = "Admin", description = "Roster import, interviewer registry and reports")
    )
    // No servers section; the backend sets it when merging this document.
)]
pub struct SchedulingApiDoc;
