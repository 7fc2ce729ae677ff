//! Repository for the interviewer registry
//!
//! Interviewer identities come from the auth layer; this registry records the
//! attributes the scheduling core needs: the department an interviewer serves
//! and whether their calendar accepts invites.

use crate::error::DbError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered interviewer.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Interviewer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub department: String,
    pub calendar_connected: bool,
}

/// An interviewer to register, keyed by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInterviewer {
    pub name: String,
    pub email: String,
    pub department: String,
    #[serde(default)]
    pub calendar_connected: bool,
}

/// Repository for the interviewer registry
pub trait InterviewerRepository {
    /// Initialize the database schema
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Register an interviewer, updating the row if the email already exists.
    fn upsert(
        &self,
        interviewer: &NewInterviewer,
    ) -> impl std::future::Future<Output = Result<Interviewer, DbError>> + Send;

    /// Find an interviewer by email.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<Interviewer>, DbError>> + Send;

    /// List all registered interviewers.
    fn list_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Interviewer>, DbError>> + Send;

    /// Total number of registered interviewers.
    fn count(&self) -> impl std::future::Future<Output = Result<i64, DbError>> + Send;

    /// Number of interviewers registered for a department.
    fn count_for_department(
        &self,
        department: &str,
    ) -> impl std::future::Future<Output = Result<i64, DbError>> + Send;
}
