// --- File: crates/slotwise_scheduling/src/booking.rs ---
//! Booking allocation.
//!
//! `book` runs the ordered precondition chain, claims one slot atomically,
//! and only then mirrors the interview into the external calendar. The
//! committed booking is authoritative: notification failures degrade the
//! response but never unwind the claim, and a fallback meeting link is
//! substituted so the caller always gets one.

use crate::eligibility;
use crate::error::SchedulingError;
use crate::slots;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rand::Rng;
use serde::{Deserialize, Serialize};
use slotwise_common::services::{BoxedError, CalendarNotifier, InterviewEvent};
use slotwise_config::AppConfig;
use slotwise_db::{
    Booking, BookingRepository, ClaimOutcome, ClaimRequest, InterviewerRepository,
    RosterRepository, SlotRepository, SqlBookingRepository, SqlInterviewerRepository,
    SqlRosterRepository, SqlSlotRepository,
};
use tracing::{info, warn};

/// Body of the booking endpoint.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookingRequest {
    /// Requested slot start, RFC3339.
    pub start_time: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Outcome of the post-commit calendar notification.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    /// The calendar event was created.
    Created,
    /// The notifier failed; the booking stands with a fallback link.
    Degraded,
    /// No notifier is configured.
    Skipped,
}

/// A confirmed booking as rendered to the student.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingView {
    pub id: i64,
    pub interviewer_name: String,
    pub interviewer_email: String,
    pub student_name: String,
    pub student_email: String,
    /// RFC3339 in the reference timezone.
    pub start_time: String,
    pub end_time: String,
    pub meeting_link: String,
}

/// Response of a successful booking, full or degraded.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub booking: BookingView,
    pub notification: NotificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_error: Option<String>,
}

/// Book one slot at the requested start for the given student.
///
/// Preconditions are checked in order, each with its own named failure:
/// input validation, temporal validity, roster resolution (plus a non-empty
/// interviewer pool under department affinity), the single-booking invariant,
/// and slot availability. The pre-checks fail fast; the atomic claim re-runs
/// the same predicates inside its transaction, so a lost race surfaces as
/// `AlreadyBooked` or `SlotUnavailable` and never as a double assignment.
///
/// Among the open candidates at the requested start, one is chosen uniformly
/// at random to spread interviews across interviewers.
pub async fn book(
    store: &SqlSlotRepository,
    bookings: &SqlBookingRepository,
    roster: &SqlRosterRepository,
    interviewers: &SqlInterviewerRepository,
    notifier: Option<&dyn CalendarNotifier<Error = BoxedError>>,
    config: &AppConfig,
    request: &BookingRequest,
    now: DateTime<Utc>,
) -> Result<BookingConfirmation, SchedulingError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(SchedulingError::Validation("name is required".to_string()));
    }
    let email = request.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(SchedulingError::Validation(
            "a valid email is required".to_string(),
        ));
    }
    let Some(phone) = eligibility::normalize_phone(&request.phone) else {
        return Err(SchedulingError::Validation(
            "phone number must contain at least ten digits".to_string(),
        ));
    };
    let start = DateTime::parse_from_rfc3339(request.start_time.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            SchedulingError::Validation(
                "invalid 'start_time' instant, expected RFC3339".to_string(),
            )
        })?;

    if start < now {
        return Err(SchedulingError::Validation(
            "the requested start is in the past".to_string(),
        ));
    }

    let student = roster
        .find_by_phone(&phone)
        .await?
        .ok_or(SchedulingError::NotAuthorized)?;
    let department = if config.scheduling.department_affinity {
        let department = student.department;
        if interviewers.count_for_department(&department).await? == 0 {
            return Err(SchedulingError::NoInterviewersAvailable(department));
        }
        Some(department)
    } else {
        None
    };

    // Fast-fail pre-checks; the claim re-verifies both inside its transaction.
    if let Some(existing) = bookings.find_by_student_email(&email).await? {
        return Err(SchedulingError::AlreadyBooked {
            existing: Box::new(existing),
        });
    }
    let start_ms = start.timestamp_millis();
    let candidates = store
        .open_candidates_at(start_ms, department.as_deref())
        .await?;
    if candidates.is_empty() {
        return Err(SchedulingError::SlotUnavailable);
    }

    let claim = ClaimRequest {
        student_name: name,
        student_email: &email,
        student_phone: &phone,
        start_ms,
        department: department.as_deref(),
        created_at_ms: now.timestamp_millis(),
    };
    let outcome = bookings
        .claim(&claim, &|count| rand::thread_rng().gen_range(0..count))
        .await?;
    let booking = match outcome {
        ClaimOutcome::Booked(booking) => booking,
        ClaimOutcome::AlreadyBooked(existing) => {
            return Err(SchedulingError::AlreadyBooked {
                existing: Box::new(existing),
            })
        }
        ClaimOutcome::NoOpenSlot => return Err(SchedulingError::SlotUnavailable),
    };
    info!(
        "Booking {} confirmed: {} with {} at {}",
        booking.id, booking.student_email, booking.interviewer_email, request.start_time
    );

    let zone = slots::reference_zone(&config.scheduling);
    Ok(notify_and_attach(bookings, interviewers, notifier, config, zone, booking).await)
}

/// Fallback meeting link minted when the calendar integration is out of the
/// picture: `{base}/{interviewer-name}-{student-name}`, lowercased, spaces
/// hyphenated.
pub fn fallback_meeting_link(base: &str, interviewer_name: &str, student_name: &str) -> String {
    format!(
        "{}/{}-{}",
        base.trim_end_matches('/'),
        slug(interviewer_name),
        slug(student_name)
    )
}

fn slug(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Mirror the committed booking into the calendar and record the result.
///
/// Everything in here is best-effort: the booking is already durable, so
/// failures are logged and folded into the response instead of propagated.
async fn notify_and_attach(
    bookings: &SqlBookingRepository,
    interviewers: &SqlInterviewerRepository,
    notifier: Option<&dyn CalendarNotifier<Error = BoxedError>>,
    config: &AppConfig,
    zone: Tz,
    booking: Booking,
) -> BookingConfirmation {
    let interviewer_name = match interviewers.find_by_email(&booking.interviewer_email).await {
        Ok(Some(interviewer)) => interviewer.name,
        Ok(None) => booking.interviewer_email.clone(),
        Err(e) => {
            warn!("Interviewer lookup failed after booking {}: {}", booking.id, e);
            booking.interviewer_email.clone()
        }
    };
    let fallback = fallback_meeting_link(
        &config.scheduling.fallback_link_base,
        &interviewer_name,
        &booking.student_name,
    );

    let (status, meeting_link, event_id, notification_error) = match notifier {
        None => (NotificationStatus::Skipped, fallback, None, None),
        Some(notifier) => {
            let event = InterviewEvent {
                start_time: slots::instant_from_millis(booking.start_ms),
                end_time: slots::instant_from_millis(booking.end_ms),
                summary: format!("Interview: {} with {}", booking.student_name, interviewer_name),
                description: Some(format!(
                    "Interview scheduled through Slotwise for {}.",
                    booking.student_email
                )),
                interviewer_email: booking.interviewer_email.clone(),
                student_email: booking.student_email.clone(),
            };
            let calendar_id = config
                .gcal
                .as_ref()
                .and_then(|gcal| gcal.calendar_id.as_deref())
                .unwrap_or("primary");
            match notifier.create_event(calendar_id, event).await {
                Ok(created) => {
                    let link = created.meeting_link.unwrap_or(fallback);
                    (NotificationStatus::Created, link, created.event_id, None)
                }
                Err(e) => {
                    warn!(
                        "Calendar notification failed for booking {}: {}",
                        booking.id, e
                    );
                    (
                        NotificationStatus::Degraded,
                        fallback,
                        None,
                        Some(e.to_string()),
                    )
                }
            }
        }
    };

    if let Err(e) = bookings
        .attach_notification(booking.id, &meeting_link, event_id.as_deref())
        .await
    {
        warn!(
            "Failed to record notification result for booking {}: {}",
            booking.id, e
        );
    }

    BookingConfirmation {
        booking: BookingView {
            id: booking.id,
            interviewer_name,
            interviewer_email: booking.interviewer_email,
            student_name: booking.student_name,
            student_email: booking.student_email,
            start_time: slots::render_instant(booking.start_ms, zone),
            end_time: slots::render_instant(booking.end_ms, zone),
            meeting_link,
        },
        notification: status,
        notification_error,
    }
}
