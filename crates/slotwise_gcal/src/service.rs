// --- File: crates/slotwise_gcal/src/service.rs ---
//! Google Calendar implementation of the booking notifier.
//!
//! Confirmed interviews are mirrored into a shared calendar with a Meet
//! conference attached. The booking row stays authoritative: callers treat
//! any error surfaced here as a degraded booking, never a failed one.

use std::sync::Arc;

use google_calendar3::api::{
    ConferenceData, ConferenceSolutionKey, CreateConferenceRequest, Event, EventAttendee,
    EventDateTime, EventReminder, EventReminders,
};
use slotwise_common::services::{BoxFuture, CalendarNotifier, CreatedEvent, InterviewEvent};
use thiserror::Error;
use tracing::info;

use crate::auth::HubType;

/// Errors that can occur when mirroring an interview into Google Calendar.
#[derive(Error, Debug)]
pub enum GcalNotifierError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),
    #[error("Invalid event window: {0}")]
    InvalidEvent(String),
}

/// Google Calendar notifier implementation.
pub struct GoogleCalendarNotifier {
    calendar_hub: Arc<HubType>,
}

impl GoogleCalendarNotifier {
    /// Create a new Google Calendar notifier.
    pub fn new(calendar_hub: Arc<HubType>) -> Self {
        Self { calendar_hub }
    }
}

/// Assemble the calendar payload for a confirmed interview.
///
/// Both participants are attached as attendees and a Meet conference is
/// requested so the created event carries a join link. Attendees get an
/// email reminder ten minutes before the interview starts.
fn build_interview_event(event: &InterviewEvent, request_id: &str) -> Event {
    Event {
        summary: Some(event.summary.clone()),
        description: event.description.clone(),
        start: Some(EventDateTime {
            date_time: Some(event.start_time),
            time_zone: Some("UTC".to_string()),
            ..Default::default()
        }),
        end: Some(EventDateTime {
            date_time: Some(event.end_time),
            time_zone: Some("UTC".to_string()),
            ..Default::default()
        }),
        attendees: Some(vec![
            EventAttendee {
                email: Some(event.interviewer_email.clone()),
                ..Default::default()
            },
            EventAttendee {
                email: Some(event.student_email.clone()),
                ..Default::default()
            },
        ]),
        conference_data: Some(ConferenceData {
            create_request: Some(CreateConferenceRequest {
                request_id: Some(request_id.to_string()),
                conference_solution_key: Some(ConferenceSolutionKey {
                    type_: Some("hangoutsMeet".to_string()),
                }),
                ..Default::default()
            }),
            ..Default::default()
        }),
        reminders: Some(EventReminders {
            use_default: Some(false),
            overrides: Some(vec![EventReminder {
                method: Some("email".to_string()),
                minutes: Some(10),
            }]),
        }),
        ..Default::default()
    }
}

impl CalendarNotifier for GoogleCalendarNotifier {
    type Error = GcalNotifierError;

    /// Creates the interview event in the given calendar.
    ///
    /// The insert is sent with `conferenceDataVersion=1` so the Meet request
    /// is honored, and `sendUpdates=all` so both attendees are emailed an
    /// invitation by Google.
    fn create_event(
        &self,
        calendar_id: &str,
        event: InterviewEvent,
    ) -> BoxFuture<'_, CreatedEvent, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            if event.end_time <= event.start_time {
                return Err(GcalNotifierError::InvalidEvent(
                    "end time must be after start time".to_string(),
                ));
            }

            // Conference creation is idempotent per request id.
            let request_id = uuid::Uuid::new_v4().to_string();
            let payload = build_interview_event(&event, &request_id);

            let (_response, created) = calendar_hub
                .events()
                .insert(payload, &calendar_id)
                .conference_data_version(1)
                .send_updates("all")
                .doit()
                .await?;

            info!(
                "Created calendar event {:?} for '{}'",
                created.id, event.summary
            );

            Ok(CreatedEvent {
                event_id: created.id,
                meeting_link: created.hangout_link,
                status: created.status.unwrap_or_else(|| "confirmed".to_string()),
            })
        })
    }
}
