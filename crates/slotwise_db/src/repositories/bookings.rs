//! Repository for bookings
//!
//! This module provides the interface for the booking records created by the
//! atomic slot claim. A booking denormalizes the slot's times and interviewer
//! at claim time so slots can later be pruned or regenerated without touching
//! history.

use crate::error::DbError;
use sqlx::FromRow;

/// A persisted booking.
///
/// At most one booking exists per student email, enforced both by a unique
/// index and by the re-check inside the atomic claim.
#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: i64,
    pub slot_id: i64,
    pub interviewer_email: String,
    pub student_name: String,
    pub student_email: String,
    pub student_phone: String,
    pub start_ms: i64,
    pub end_ms: i64,
    pub meeting_link: Option<String>,
    pub calendar_event_id: Option<String>,
    pub created_at_ms: i64,
}

/// Everything the atomic claim needs to know about the request.
#[derive(Debug, Clone, Copy)]
pub struct ClaimRequest<'a> {
    pub student_name: &'a str,
    pub student_email: &'a str,
    pub student_phone: &'a str,
    /// Requested slot start; candidates are matched on this instant alone.
    pub start_ms: i64,
    /// Restrict the candidate pool to interviewers of this department.
    pub department: Option<&'a str>,
    pub created_at_ms: i64,
}

/// Result of an atomic claim attempt.
#[derive(Debug, Clone)]
pub enum ClaimOutcome {
    /// A slot was claimed and the booking created.
    Booked(Booking),
    /// The student already holds a booking; carries it for display.
    AlreadyBooked(Booking),
    /// No unbooked slot remained at the requested start inside the transaction.
    NoOpenSlot,
}

/// Repository for bookings
pub trait BookingRepository {
    /// Initialize the database schema
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Find a booking by the student's email, past or future.
    fn find_by_student_email(
        &self,
        student_email: &str,
    ) -> impl std::future::Future<Output = Result<Option<Booking>, DbError>> + Send;

    /// Atomically claim one open slot at the requested start and create the
    /// booking for it.
    ///
    /// Inside a single immediate transaction this re-checks the one-booking
    /// invariant, re-fetches the open candidates, picks one via `selector`
    /// (called with the candidate count, must return an index below it),
    /// flips the slot's booked flag and inserts the booking. Any failure rolls
    /// the whole transaction back; no partial state is committed.
    fn claim(
        &self,
        request: &ClaimRequest<'_>,
        selector: &(dyn Fn(usize) -> usize + Send + Sync),
    ) -> impl std::future::Future<Output = Result<ClaimOutcome, DbError>> + Send;

    /// Attach the calendar event id and meeting link to a booking.
    ///
    /// This is the best-effort follow-up after notification; it never affects
    /// the validity of the booking itself.
    fn attach_notification(
        &self,
        booking_id: i64,
        meeting_link: &str,
        calendar_event_id: Option<&str>,
    ) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// List bookings whose start falls within `[from_ms, to_ms)`, ordered by
    /// start time.
    fn list_between(
        &self,
        from_ms: i64,
        to_ms: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Booking>, DbError>> + Send;

    /// List every booking, ordered by start time.
    fn list_all(&self) -> impl std::future::Future<Output = Result<Vec<Booking>, DbError>> + Send;

    /// Total number of bookings.
    fn count(&self) -> impl std::future::Future<Output = Result<i64, DbError>> + Send;
}
