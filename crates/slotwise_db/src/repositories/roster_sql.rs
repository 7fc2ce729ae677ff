//! SQL implementation of the roster repository

use crate::error::DbError;
use crate::repositories::roster::{NewRosterStudent, RosterRepository, RosterStudent};
use crate::repositories::{begin_immediate, commit, rollback};
use crate::DbClient;
use sqlx::SqliteConnection;
use tracing::{debug, error, info};

/// SQL implementation of the roster repository
#[derive(Debug, Clone)]
pub struct SqlRosterRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlRosterRepository {
    /// Create a new SQL roster repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

async fn upsert_in_txn(
    conn: &mut SqliteConnection,
    students: &[NewRosterStudent],
) -> Result<u64, DbError> {
    let mut written = 0u64;
    for student in students {
        let result = sqlx::query(
            r#"
            INSERT INTO roster_students (application_id, name, email, phone, department)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT(phone) DO UPDATE SET
                application_id = excluded.application_id,
                name = excluded.name,
                email = excluded.email,
                department = excluded.department
        "#,
        )
        .bind(&student.application_id)
        .bind(&student.name)
        .bind(&student.email)
        .bind(&student.phone)
        .bind(&student.department)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            error!("Failed to upsert roster entry: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        written += result.rows_affected();
    }
    Ok(written)
}

impl RosterRepository for SqlRosterRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing roster schema");

        // Phone is the import key; emails are not assumed unique.
        let query = r#"
            CREATE TABLE IF NOT EXISTS roster_students (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                application_id TEXT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT NOT NULL UNIQUE,
                department TEXT NOT NULL
            )
        "#;
        self.db_client.execute(query).await?;

        info!("Roster schema initialized successfully");
        Ok(())
    }

    async fn upsert_students(&self, students: &[NewRosterStudent]) -> Result<u64, DbError> {
        debug!("Importing {} roster entries", students.len());

        let mut conn = begin_immediate(self.db_client.pool()).await?;
        let result = upsert_in_txn(&mut conn, students).await;
        match &result {
            Ok(written) => {
                commit(&mut conn).await?;
                info!("Imported {} roster entries", written);
            }
            Err(_) => rollback(&mut conn).await,
        }
        result
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<RosterStudent>, DbError> {
        debug!("Looking up roster entry by phone");

        sqlx::query_as::<_, RosterStudent>(
            r#"
            SELECT id, application_id, name, email, phone, department
            FROM roster_students
            WHERE phone = $1
        "#,
        )
        .bind(phone)
        .fetch_optional(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to look up roster entry: {}", e);
            DbError::QueryError(e.to_string())
        })
    }

    async fn list_all(&self) -> Result<Vec<RosterStudent>, DbError> {
        sqlx::query_as::<_, RosterStudent>(
            r#"
            SELECT id, application_id, name, email, phone, department
            FROM roster_students
            ORDER BY department, name
        "#,
        )
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to list roster entries: {}", e);
            DbError::QueryError(e.to_string())
        })
    }

    async fn count(&self) -> Result<i64, DbError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM roster_students")
            .fetch_one(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to count roster entries: {}", e);
                DbError::QueryError(e.to_string())
            })
    }
}
