//! Repository modules for database access
//!
//! This module contains repository traits and implementations for the
//! different database entities, plus the transaction helpers shared by the
//! write paths.

use crate::error::DbError;
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqlitePool};
use tracing::warn;

pub mod bookings;
pub mod bookings_sql;
pub mod interviewers;
pub mod interviewers_sql;
pub mod roster;
pub mod roster_sql;
pub mod slots;
pub mod slots_sql;
#[cfg(test)]
mod slots_sql_test;

// Re-export the repository traits, models and SQL implementations for ease of use
pub use bookings::{Booking, BookingRepository, ClaimOutcome, ClaimRequest};
pub use bookings_sql::SqlBookingRepository;
pub use interviewers::{Interviewer, InterviewerRepository, NewInterviewer};
pub use interviewers_sql::SqlInterviewerRepository;
pub use roster::{NewRosterStudent, RosterRepository, RosterStudent};
pub use roster_sql::SqlRosterRepository;
pub use slots::{NewSlot, ReplaceOutcome, ReplaceWindow, Slot, SlotCounts, SlotRepository};
pub use slots_sql::SqlSlotRepository;

/// Begin an immediate transaction on a dedicated pool connection.
///
/// Write paths take the SQLite write lock up front; upgrading a deferred
/// transaction mid-flight can fail with `SQLITE_BUSY`.
pub(crate) async fn begin_immediate(pool: &SqlitePool) -> Result<PoolConnection<Sqlite>, DbError> {
    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| DbError::PoolError(e.to_string()))?;
    sqlx::query("BEGIN IMMEDIATE")
        .execute(&mut *conn)
        .await
        .map_err(|e| DbError::TransactionError(e.to_string()))?;
    Ok(conn)
}

/// Commit the transaction held on `conn`.
pub(crate) async fn commit(conn: &mut PoolConnection<Sqlite>) -> Result<(), DbError> {
    sqlx::query("COMMIT")
        .execute(&mut **conn)
        .await
        .map_err(|e| DbError::TransactionError(e.to_string()))?;
    Ok(())
}

/// Roll back the transaction held on `conn`, logging instead of failing.
pub(crate) async fn rollback(conn: &mut PoolConnection<Sqlite>) {
    if let Err(e) = sqlx::query("ROLLBACK").execute(&mut **conn).await {
        warn!("Failed to roll back transaction: {}", e);
    }
}
