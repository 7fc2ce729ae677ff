//! SQL implementation of the slot repository

use crate::error::DbError;
use crate::repositories::slots::{
    NewSlot, ReplaceOutcome, ReplaceWindow, Slot, SlotCounts, SlotRepository,
};
use crate::repositories::{begin_immediate, commit, rollback};
use crate::DbClient;
use sqlx::{Executor, Sqlite, SqliteConnection};
use tracing::{debug, error, info};

/// SQL implementation of the slot repository
#[derive(Debug, Clone)]
pub struct SqlSlotRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlSlotRepository {
    /// Create a new SQL slot repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

/// Fetch the unbooked slots at exactly `start_ms`, optionally restricted to
/// interviewers of one department.
///
/// Generic over the executor so the booking claim can re-run the identical
/// predicate inside its transaction that the pre-check ran against the pool.
pub(crate) async fn open_candidates_at<'e, E>(
    executor: E,
    start_ms: i64,
    department: Option<&str>,
) -> Result<Vec<Slot>, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = match department {
        Some(dept) => {
            sqlx::query_as::<_, Slot>(
                r#"
                SELECT s.id, s.interviewer_email, s.start_ms, s.end_ms, s.is_booked
                FROM slots s
                JOIN interviewers i ON i.email = s.interviewer_email
                WHERE s.start_ms = $1 AND s.is_booked = 0 AND i.department = $2
                ORDER BY s.id
            "#,
            )
            .bind(start_ms)
            .bind(dept)
            .fetch_all(executor)
            .await
        }
        None => {
            sqlx::query_as::<_, Slot>(
                r#"
                SELECT id, interviewer_email, start_ms, end_ms, is_booked
                FROM slots
                WHERE start_ms = $1 AND is_booked = 0
                ORDER BY id
            "#,
            )
            .bind(start_ms)
            .fetch_all(executor)
            .await
        }
    };

    result.map_err(|e| {
        error!("Failed to fetch open slot candidates: {}", e);
        DbError::QueryError(e.to_string())
    })
}

async fn declare_in_txn(
    conn: &mut SqliteConnection,
    interviewer_email: &str,
    slots: &[NewSlot],
) -> Result<u64, DbError> {
    let mut created = 0u64;
    for slot in slots {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO slots (interviewer_email, start_ms, end_ms)
            VALUES ($1, $2, $3)
        "#,
        )
        .bind(interviewer_email)
        .bind(slot.start_ms)
        .bind(slot.end_ms)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            error!("Failed to insert slot: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        created += result.rows_affected();
    }
    Ok(created)
}

async fn delete_unbooked_in_txn(
    conn: &mut SqliteConnection,
    interviewer_email: &str,
    from_ms: i64,
    to_ms: i64,
) -> Result<u64, DbError> {
    let result = sqlx::query(
        r#"
        DELETE FROM slots
        WHERE interviewer_email = $1 AND is_booked = 0
          AND start_ms >= $2 AND end_ms <= $3
    "#,
    )
    .bind(interviewer_email)
    .bind(from_ms)
    .bind(to_ms)
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        error!("Failed to delete unbooked slots: {}", e);
        DbError::QueryError(e.to_string())
    })?;

    Ok(result.rows_affected())
}

impl SlotRepository for SqlSlotRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing slots schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS slots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                interviewer_email TEXT NOT NULL,
                start_ms INTEGER NOT NULL,
                end_ms INTEGER NOT NULL,
                is_booked INTEGER NOT NULL DEFAULT 0,
                UNIQUE(interviewer_email, start_ms, end_ms)
            )
        "#;
        self.db_client.execute(query).await?;

        self.db_client
            .execute("CREATE INDEX IF NOT EXISTS idx_slots_start ON slots (start_ms, is_booked)")
            .await?;

        info!("Slots schema initialized successfully");
        Ok(())
    }

    async fn bulk_declare(
        &self,
        interviewer_email: &str,
        slots: &[NewSlot],
    ) -> Result<u64, DbError> {
        debug!(
            "Declaring {} slots for interviewer: {}",
            slots.len(),
            interviewer_email
        );

        let mut conn = begin_immediate(self.db_client.pool()).await?;
        let result = declare_in_txn(&mut conn, interviewer_email, slots).await;
        match &result {
            Ok(created) => {
                commit(&mut conn).await?;
                info!(
                    "Declared {} new slots for interviewer: {} ({} duplicates skipped)",
                    created,
                    interviewer_email,
                    slots.len() as u64 - created
                );
            }
            Err(_) => rollback(&mut conn).await,
        }
        result
    }

    async fn replace_windows(
        &self,
        interviewer_email: &str,
        windows: &[ReplaceWindow],
    ) -> Result<ReplaceOutcome, DbError> {
        debug!(
            "Replacing {} day windows for interviewer: {}",
            windows.len(),
            interviewer_email
        );

        let mut conn = begin_immediate(self.db_client.pool()).await?;

        let mut outcome = ReplaceOutcome::default();
        let mut failed = None;
        for window in windows {
            match delete_unbooked_in_txn(&mut conn, interviewer_email, window.from_ms, window.to_ms)
                .await
            {
                Ok(removed) => outcome.removed += removed,
                Err(e) => {
                    failed = Some(e);
                    break;
                }
            }
            match declare_in_txn(&mut conn, interviewer_email, &window.slots).await {
                Ok(created) => outcome.created += created,
                Err(e) => {
                    failed = Some(e);
                    break;
                }
            }
        }

        if let Some(e) = failed {
            rollback(&mut conn).await;
            return Err(e);
        }

        commit(&mut conn).await?;
        info!(
            "Replaced availability for interviewer: {} (removed {}, created {})",
            interviewer_email, outcome.removed, outcome.created
        );
        Ok(outcome)
    }

    async fn delete_unbooked_range(
        &self,
        interviewer_email: &str,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<u64, DbError> {
        debug!(
            "Deleting unbooked slots for interviewer: {} in range {}..{}",
            interviewer_email, from_ms, to_ms
        );

        let result = sqlx::query(
            r#"
            DELETE FROM slots
            WHERE interviewer_email = $1 AND is_booked = 0
              AND start_ms >= $2 AND end_ms <= $3
        "#,
        )
        .bind(interviewer_email)
        .bind(from_ms)
        .bind(to_ms)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to delete unbooked slots: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        Ok(result.rows_affected())
    }

    async fn open_slots_for_interviewer(
        &self,
        interviewer_email: &str,
        after_ms: i64,
    ) -> Result<Vec<Slot>, DbError> {
        debug!("Listing open slots for interviewer: {}", interviewer_email);

        sqlx::query_as::<_, Slot>(
            r#"
            SELECT id, interviewer_email, start_ms, end_ms, is_booked
            FROM slots
            WHERE interviewer_email = $1 AND is_booked = 0 AND start_ms >= $2
            ORDER BY start_ms
        "#,
        )
        .bind(interviewer_email)
        .bind(after_ms)
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to list open slots: {}", e);
            DbError::QueryError(e.to_string())
        })
    }

    async fn open_slots(
        &self,
        after_ms: i64,
        department: Option<&str>,
    ) -> Result<Vec<Slot>, DbError> {
        debug!("Listing open slots (department: {:?})", department);

        let result = match department {
            Some(dept) => {
                sqlx::query_as::<_, Slot>(
                    r#"
                    SELECT s.id, s.interviewer_email, s.start_ms, s.end_ms, s.is_booked
                    FROM slots s
                    JOIN interviewers i ON i.email = s.interviewer_email
                    WHERE s.is_booked = 0 AND s.start_ms >= $1 AND i.department = $2
                    ORDER BY s.start_ms, s.id
                "#,
                )
                .bind(after_ms)
                .bind(dept)
                .fetch_all(self.db_client.pool())
                .await
            }
            None => {
                sqlx::query_as::<_, Slot>(
                    r#"
                    SELECT id, interviewer_email, start_ms, end_ms, is_booked
                    FROM slots
                    WHERE is_booked = 0 AND start_ms >= $1
                    ORDER BY start_ms, id
                "#,
                )
                .bind(after_ms)
                .fetch_all(self.db_client.pool())
                .await
            }
        };

        result.map_err(|e| {
            error!("Failed to list open slots: {}", e);
            DbError::QueryError(e.to_string())
        })
    }

    async fn open_candidates_at(
        &self,
        start_ms: i64,
        department: Option<&str>,
    ) -> Result<Vec<Slot>, DbError> {
        open_candidates_at(self.db_client.pool(), start_ms, department).await
    }

    async fn counts(&self) -> Result<SlotCounts, DbError> {
        let (total, booked) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COALESCE(SUM(is_booked), 0) FROM slots",
        )
        .fetch_one(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to count slots: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        Ok(SlotCounts { total, booked })
    }

    async fn counts_for_interviewer(
        &self,
        interviewer_email: &str,
    ) -> Result<SlotCounts, DbError> {
        let (total, booked) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COALESCE(SUM(is_booked), 0)
            FROM slots
            WHERE interviewer_email = $1
        "#,
        )
        .bind(interviewer_email)
        .fetch_one(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to count slots for interviewer: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        Ok(SlotCounts { total, booked })
    }
}
