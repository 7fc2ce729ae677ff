//! Repository for availability slots
//!
//! This module provides the interface for storing and querying the bookable
//! time slots interviewers declare.

use crate::error::DbError;
use sqlx::FromRow;

/// A persisted availability slot.
///
/// A slot's booked flag flips false to true exactly once, inside the atomic
/// claim; booked slots are never deleted.
#[derive(Debug, Clone, FromRow)]
pub struct Slot {
    pub id: i64,
    pub interviewer_email: String,
    pub start_ms: i64,
    pub end_ms: i64,
    pub is_booked: bool,
}

/// A slot candidate produced by the generator, not yet persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewSlot {
    pub start_ms: i64,
    pub end_ms: i64,
}

/// A day window to reset together with the slots replacing its contents.
#[derive(Debug, Clone)]
pub struct ReplaceWindow {
    pub from_ms: i64,
    pub to_ms: i64,
    pub slots: Vec<NewSlot>,
}

/// Counts reported by a range-scoped replace.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplaceOutcome {
    pub removed: u64,
    pub created: u64,
}

/// Aggregate slot counts for the dashboard.
#[derive(Debug, Clone, Copy)]
pub struct SlotCounts {
    pub total: i64,
    pub booked: i64,
}

/// Repository for availability slots
pub trait SlotRepository {
    /// Initialize the database schema
    ///
    /// Creates the slots table and its indexes if they don't already exist.
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Insert the given slots for an interviewer, skipping duplicates.
    ///
    /// A slot already present at the same `(start, end)` for the same
    /// interviewer is silently ignored, which makes re-declaration idempotent.
    ///
    /// # Returns
    ///
    /// The number of slots actually created.
    fn bulk_declare(
        &self,
        interviewer_email: &str,
        slots: &[NewSlot],
    ) -> impl std::future::Future<Output = Result<u64, DbError>> + Send;

    /// Atomically reset day windows for an interviewer.
    ///
    /// For each window, deletes the interviewer's unbooked slots inside it and
    /// then inserts the replacement set, all in one transaction. Booked slots
    /// are never touched; a replacement colliding with one is skipped.
    fn replace_windows(
        &self,
        interviewer_email: &str,
        windows: &[ReplaceWindow],
    ) -> impl std::future::Future<Output = Result<ReplaceOutcome, DbError>> + Send;

    /// Delete an interviewer's unbooked slots within `[from_ms, to_ms]`.
    ///
    /// Booked slots in the range are left intact.
    ///
    /// # Returns
    ///
    /// The number of slots deleted.
    fn delete_unbooked_range(
        &self,
        interviewer_email: &str,
        from_ms: i64,
        to_ms: i64,
    ) -> impl std::future::Future<Output = Result<u64, DbError>> + Send;

    /// List an interviewer's open slots starting at or after `after_ms`,
    /// ordered by start time.
    fn open_slots_for_interviewer(
        &self,
        interviewer_email: &str,
        after_ms: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Slot>, DbError>> + Send;

    /// List open slots across interviewers starting at or after `after_ms`.
    ///
    /// When a department is given, only slots owned by interviewers registered
    /// in that department are returned.
    fn open_slots(
        &self,
        after_ms: i64,
        department: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<Slot>, DbError>> + Send;

    /// List the open slots at exactly `start_ms`, one per interviewer still
    /// free at that time, optionally restricted to a department.
    ///
    /// This is the pre-check view of the same predicate the atomic claim
    /// re-runs inside its transaction.
    fn open_candidates_at(
        &self,
        start_ms: i64,
        department: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<Slot>, DbError>> + Send;

    /// Total and booked slot counts.
    fn counts(&self) -> impl std::future::Future<Output = Result<SlotCounts, DbError>> + Send;

    /// Total and booked slot counts for one interviewer.
    fn counts_for_interviewer(
        &self,
        interviewer_email: &str,
    ) -> impl std::future::Future<Output = Result<SlotCounts, DbError>> + Send;
}
