// --- File: crates/slotwise_common/src/services.rs ---
//! Service abstractions for external services.
//!
//! This module provides trait definitions for the external services used by the
//! booking flow. These traits allow for dependency injection and easier testing
//! by decoupling the application logic from specific implementations (Google
//! Calendar today, possibly others later).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// A trait for mirroring confirmed interviews into an external calendar.
///
/// The booking stored in the database is authoritative. Callers invoke the
/// notifier only after the booking is committed and treat notifier failures
/// as a degraded (still successful) booking.
pub trait CalendarNotifier: Send + Sync {
    /// Error type returned by notifier operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a calendar event for a confirmed interview.
    fn create_event(
        &self,
        calendar_id: &str,
        event: InterviewEvent,
    ) -> BoxFuture<'_, CreatedEvent, Self::Error>;
}

/// A factory for creating service instances.
///
/// This trait provides methods for creating instances of the services the
/// application needs, wired up according to the runtime configuration.
pub trait ServiceFactory: Send + Sync {
    /// Get a calendar notifier instance, if one is configured.
    fn calendar_notifier(&self) -> Option<Arc<dyn CalendarNotifier<Error = BoxedError>>>;
}

/// A confirmed interview to be mirrored into an external calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewEvent {
    /// The start time of the interview.
    pub start_time: DateTime<Utc>,
    /// The end time of the interview.
    pub end_time: DateTime<Utc>,
    /// The summary or title of the event.
    pub summary: String,
    /// An optional description of the event.
    pub description: Option<String>,
    /// Email address of the interviewer attending.
    pub interviewer_email: String,
    /// Email address of the student attending.
    pub student_email: String,
}

/// Represents the result of creating a calendar event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedEvent {
    /// The ID of the event.
    pub event_id: Option<String>,
    /// The conferencing link attached to the event, if the provider issued one.
    pub meeting_link: Option<String>,
    /// The status of the event.
    pub status: String,
}
