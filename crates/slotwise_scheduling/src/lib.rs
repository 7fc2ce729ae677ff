// --- File: crates/slotwise_scheduling/src/lib.rs ---
//! Scheduling core for Slotwise.
//!
//! This crate owns the interview-scheduling feature surface: the slot
//! generator that expands declared wall-clock ranges into bookable windows,
//! the availability operations interviewers drive, the eligibility gate for
//! roster students, the booking allocator with its atomic claim, and the
//! admin read-side. HTTP handlers and routes live here too; the binary only
//! mounts them under `/api`.

// Declare modules within this crate
pub mod admin;
#[cfg(test)]
mod admin_test;
pub mod availability;
pub mod booking;
pub mod doc;
pub mod eligibility;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod slots;
#[cfg(test)]
mod slots_proptest;
#[cfg(test)]
mod slots_test;

pub use error::SchedulingError;
pub use handlers::SchedulingState;
pub use routes::routes;
