// --- File: crates/slotwise_scheduling/src/routes.rs ---

use crate::handlers::{
    booked_interviews_handler, create_booking_handler, dashboard_handler, declare_slots_handler,
    declare_today_handler, delete_slots_handler, eligibility_handler, import_students_handler,
    interviewer_summaries_handler, list_slots_handler, public_availability_handler,
    register_interviewer_handler, replace_slots_handler, student_records_handler, SchedulingState,
};
use axum::{
    routing::{get, post},
    Router,
};
use slotwise_common::{BoxedError, CalendarNotifier};
use slotwise_config::AppConfig;
use slotwise_db::{
    DbClient, SqlBookingRepository, SqlInterviewerRepository, SqlRosterRepository,
    SqlSlotRepository,
};
use std::sync::Arc;

/// Creates a router containing all routes for the scheduling feature.
///
/// The repositories share the given database client; the notifier is absent
/// when no calendar integration is configured, in which case bookings carry
/// the fallback meeting link.
pub fn routes(
    config: Arc<AppConfig>,
    db: DbClient,
    notifier: Option<Arc<dyn CalendarNotifier<Error = BoxedError>>>,
) -> Router {
    let state = Arc::new(SchedulingState {
        slots: SqlSlotRepository::new(db.clone()),
        bookings: SqlBookingRepository::new(db.clone()),
        roster: SqlRosterRepository::new(db.clone()),
        interviewers: SqlInterviewerRepository::new(db),
        config,
        notifier,
    });

    Router::new()
        .route("/scheduling/slots/batch", post(declare_slots_handler))
        .route("/scheduling/slots/today", post(declare_today_handler))
        .route(
            "/scheduling/slots",
            get(list_slots_handler)
                .put(replace_slots_handler)
                .delete(delete_slots_handler),
        )
        .route("/scheduling/availability", get(public_availability_handler))
        .route("/scheduling/eligibility", post(eligibility_handler))
        .route("/scheduling/bookings", post(create_booking_handler))
        .route("/admin/dashboard", get(dashboard_handler))
        .route(
            "/admin/interviewers",
            get(interviewer_summaries_handler).post(register_interviewer_handler),
        )
        .route("/admin/students", get(student_records_handler))
        .route("/admin/students/import", post(import_students_handler))
        .route("/admin/bookings", get(booked_interviews_handler))
        .with_state(state)
}
