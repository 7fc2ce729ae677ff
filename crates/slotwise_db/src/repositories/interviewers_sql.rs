//! SQL implementation of the interviewer registry

use crate::error::DbError;
use crate::repositories::interviewers::{Interviewer, InterviewerRepository, NewInterviewer};
use crate::DbClient;
use tracing::{debug, error, info};

/// SQL implementation of the interviewer registry
#[derive(Debug, Clone)]
pub struct SqlInterviewerRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlInterviewerRepository {
    /// Create a new SQL interviewer repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

impl InterviewerRepository for SqlInterviewerRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing interviewers schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS interviewers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                department TEXT NOT NULL,
                calendar_connected INTEGER NOT NULL DEFAULT 0
            )
        "#;
        self.db_client.execute(query).await?;

        info!("Interviewers schema initialized successfully");
        Ok(())
    }

    async fn upsert(&self, interviewer: &NewInterviewer) -> Result<Interviewer, DbError> {
        debug!("Registering interviewer: {}", interviewer.email);

        let registered = sqlx::query_as::<_, Interviewer>(
            r#"
            INSERT INTO interviewers (name, email, department, calendar_connected)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(email) DO UPDATE SET
                name = excluded.name,
                department = excluded.department,
                calendar_connected = excluded.calendar_connected
            RETURNING id, name, email, department, calendar_connected
        "#,
        )
        .bind(&interviewer.name)
        .bind(&interviewer.email)
        .bind(&interviewer.department)
        .bind(interviewer.calendar_connected)
        .fetch_one(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to register interviewer: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        info!(
            "Interviewer registered: {} ({})",
            registered.email, registered.department
        );
        Ok(registered)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Interviewer>, DbError> {
        debug!("Looking up interviewer: {}", email);

        sqlx::query_as::<_, Interviewer>(
            r#"
            SELECT id, name, email, department, calendar_connected
            FROM interviewers
            WHERE email = $1
        "#,
        )
        .bind(email)
        .fetch_optional(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to look up interviewer: {}", e);
            DbError::QueryError(e.to_string())
        })
    }

    async fn list_all(&self) -> Result<Vec<Interviewer>, DbError> {
        sqlx::query_as::<_, Interviewer>(
            r#"
            SELECT id, name, email, department, calendar_connected
            FROM interviewers
            ORDER BY department, name
        "#,
        )
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to list interviewers: {}", e);
            DbError::QueryError(e.to_string())
        })
    }

    async fn count(&self) -> Result<i64, DbError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM interviewers")
            .fetch_one(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to count interviewers: {}", e);
                DbError::QueryError(e.to_string())
            })
    }

    async fn count_for_department(&self, department: &str) -> Result<i64, DbError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM interviewers WHERE department = $1")
            .bind(department)
            .fetch_one(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to count interviewers for department: {}", e);
                DbError::QueryError(e.to_string())
            })
    }
}
