//! Database integration for Slotwise
//!
//! This crate provides the persistence layer for the scheduling system,
//! using SQLx with SQLite as the underlying store. It owns the schema for
//! availability slots, bookings, the student roster and the interviewer
//! registry, and exposes repository traits over them.
//!
//! All instants are stored as unix epoch milliseconds (`INTEGER` columns);
//! timezone handling stays in the calling crates.
//!
//! # Example
//!
//! ```rust,no_run
//! use slotwise_db::DbClient;
//!
//! async fn setup_db() -> Result<DbClient, slotwise_db::DbError> {
//!     DbClient::from_url("sqlite:data/slotwise.db").await
//! }
//! ```

pub mod client;
pub mod error;
pub mod repositories;

// Re-export the client and error type for ease of use
pub use client::DbClient;
pub use error::DbError;

// Re-export the repositories module components for ease of use
pub use repositories::{
    Booking, BookingRepository, ClaimOutcome, ClaimRequest, Interviewer, InterviewerRepository,
    NewInterviewer, NewRosterStudent, NewSlot, ReplaceOutcome, ReplaceWindow, RosterRepository,
    RosterStudent, Slot, SlotCounts, SlotRepository, SqlBookingRepository,
    SqlInterviewerRepository, SqlRosterRepository, SqlSlotRepository,
};
