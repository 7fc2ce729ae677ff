//! Repository for the student roster
//!
//! The roster is the external authority on who may book an interview. The
//! booking flow consumes it strictly as a lookup: does this phone belong to
//! an authorized student, and in which department.

use crate::error::DbError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A roster entry for an authorized student.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RosterStudent {
    pub id: i64,
    pub application_id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
}

/// A roster entry to import, keyed by phone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRosterStudent {
    pub application_id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
}

/// Repository for the student roster
pub trait RosterRepository {
    /// Initialize the database schema
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Import roster entries, updating rows whose phone already exists.
    ///
    /// # Returns
    ///
    /// The number of rows written (inserted or updated).
    fn upsert_students(
        &self,
        students: &[NewRosterStudent],
    ) -> impl std::future::Future<Output = Result<u64, DbError>> + Send;

    /// Find a roster entry by normalized phone number.
    fn find_by_phone(
        &self,
        phone: &str,
    ) -> impl std::future::Future<Output = Result<Option<RosterStudent>, DbError>> + Send;

    /// List the whole roster.
    fn list_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<RosterStudent>, DbError>> + Send;

    /// Total number of roster entries.
    fn count(&self) -> impl std::future::Future<Output = Result<i64, DbError>> + Send;
}
