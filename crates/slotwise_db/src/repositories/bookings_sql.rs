//! SQL implementation of the booking repository
//!
//! The claim path is the one correctness-critical write in the system: it runs
//! the candidate fetch, the one-booking re-check, the slot flip and the
//! booking insert inside one immediate transaction.

use crate::error::DbError;
use crate::repositories::bookings::{Booking, BookingRepository, ClaimOutcome, ClaimRequest};
use crate::repositories::slots_sql::open_candidates_at;
use crate::repositories::{begin_immediate, commit, rollback};
use crate::DbClient;
use sqlx::{Executor, Row, Sqlite, SqliteConnection};
use tracing::{debug, error, info, warn};

/// SQL implementation of the booking repository
#[derive(Debug, Clone)]
pub struct SqlBookingRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlBookingRepository {
    /// Create a new SQL booking repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

const BOOKING_COLUMNS: &str = "id, slot_id, interviewer_email, student_name, student_email, \
     student_phone, start_ms, end_ms, meeting_link, calendar_event_id, created_at_ms";

/// Fetch a student's booking, if any.
///
/// Generic over the executor so the atomic claim can re-run the identical
/// lookup inside its transaction that the pre-check ran against the pool.
pub(crate) async fn find_by_student_email<'e, E>(
    executor: E,
    student_email: &str,
) -> Result<Option<Booking>, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Booking>(&format!(
        "SELECT {} FROM bookings WHERE student_email = $1",
        BOOKING_COLUMNS
    ))
    .bind(student_email)
    .fetch_optional(executor)
    .await
    .map_err(|e| {
        error!("Failed to look up booking by student email: {}", e);
        DbError::QueryError(e.to_string())
    })
}

async fn claim_in_txn(
    conn: &mut SqliteConnection,
    request: &ClaimRequest<'_>,
    selector: &(dyn Fn(usize) -> usize + Send + Sync),
) -> Result<ClaimOutcome, DbError> {
    // Re-check the one-booking invariant now that we hold the write lock.
    if let Some(existing) = find_by_student_email(&mut *conn, request.student_email).await? {
        return Ok(ClaimOutcome::AlreadyBooked(existing));
    }

    // Re-fetch the candidates; a pre-check winner may have been claimed since.
    let candidates = open_candidates_at(&mut *conn, request.start_ms, request.department).await?;
    if candidates.is_empty() {
        return Ok(ClaimOutcome::NoOpenSlot);
    }

    let index = selector(candidates.len());
    let slot = candidates.get(index).ok_or_else(|| {
        DbError::QueryError(format!(
            "slot selector returned index {} for {} candidates",
            index,
            candidates.len()
        ))
    })?;

    // The guard on is_booked cannot fire while we hold the write lock, but a
    // zero-row update is still treated as a lost race rather than trusted.
    let flipped = sqlx::query("UPDATE slots SET is_booked = 1 WHERE id = $1 AND is_booked = 0")
        .bind(slot.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            error!("Failed to mark slot as booked: {}", e);
            DbError::QueryError(e.to_string())
        })?;
    if flipped.rows_affected() == 0 {
        return Ok(ClaimOutcome::NoOpenSlot);
    }

    let row = sqlx::query(
        r#"
        INSERT INTO bookings (slot_id, interviewer_email, student_name, student_email,
                              student_phone, start_ms, end_ms, created_at_ms)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id
    "#,
    )
    .bind(slot.id)
    .bind(&slot.interviewer_email)
    .bind(request.student_name)
    .bind(request.student_email)
    .bind(request.student_phone)
    .bind(slot.start_ms)
    .bind(slot.end_ms)
    .bind(request.created_at_ms)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        error!("Failed to insert booking: {}", e);
        DbError::QueryError(e.to_string())
    })?;

    let id: i64 = row
        .try_get("id")
        .map_err(|e| DbError::QueryError(e.to_string()))?;

    Ok(ClaimOutcome::Booked(Booking {
        id,
        slot_id: slot.id,
        interviewer_email: slot.interviewer_email.clone(),
        student_name: request.student_name.to_string(),
        student_email: request.student_email.to_string(),
        student_phone: request.student_phone.to_string(),
        start_ms: slot.start_ms,
        end_ms: slot.end_ms,
        meeting_link: None,
        calendar_event_id: None,
        created_at_ms: request.created_at_ms,
    }))
}

impl BookingRepository for SqlBookingRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing bookings schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS bookings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                slot_id INTEGER NOT NULL UNIQUE REFERENCES slots(id),
                interviewer_email TEXT NOT NULL,
                student_name TEXT NOT NULL,
                student_email TEXT NOT NULL UNIQUE,
                student_phone TEXT NOT NULL,
                start_ms INTEGER NOT NULL,
                end_ms INTEGER NOT NULL,
                meeting_link TEXT,
                calendar_event_id TEXT,
                created_at_ms INTEGER NOT NULL
            )
        "#;
        self.db_client.execute(query).await?;

        self.db_client
            .execute("CREATE INDEX IF NOT EXISTS idx_bookings_start ON bookings (start_ms)")
            .await?;

        info!("Bookings schema initialized successfully");
        Ok(())
    }

    async fn find_by_student_email(
        &self,
        student_email: &str,
    ) -> Result<Option<Booking>, DbError> {
        debug!("Looking up booking for student: {}", student_email);
        find_by_student_email(self.db_client.pool(), student_email).await
    }

    async fn claim(
        &self,
        request: &ClaimRequest<'_>,
        selector: &(dyn Fn(usize) -> usize + Send + Sync),
    ) -> Result<ClaimOutcome, DbError> {
        debug!(
            "Claiming slot at {} for student: {}",
            request.start_ms, request.student_email
        );

        let mut conn = begin_immediate(self.db_client.pool()).await?;
        let result = claim_in_txn(&mut conn, request, selector).await;
        match &result {
            Ok(ClaimOutcome::Booked(booking)) => {
                commit(&mut conn).await?;
                info!(
                    "Booking {} created: student {} with interviewer {} at {}",
                    booking.id, booking.student_email, booking.interviewer_email, booking.start_ms
                );
            }
            // Nothing was written on the other paths; release the lock.
            _ => rollback(&mut conn).await,
        }
        result
    }

    async fn attach_notification(
        &self,
        booking_id: i64,
        meeting_link: &str,
        calendar_event_id: Option<&str>,
    ) -> Result<(), DbError> {
        debug!("Attaching notification result to booking {}", booking_id);

        let result = sqlx::query(
            "UPDATE bookings SET meeting_link = $1, calendar_event_id = $2 WHERE id = $3",
        )
        .bind(meeting_link)
        .bind(calendar_event_id)
        .bind(booking_id)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to attach notification to booking: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            warn!(
                "No booking with id {} when attaching notification",
                booking_id
            );
        }
        Ok(())
    }

    async fn list_between(&self, from_ms: i64, to_ms: i64) -> Result<Vec<Booking>, DbError> {
        debug!("Listing bookings in range {}..{}", from_ms, to_ms);

        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings WHERE start_ms >= $1 AND start_ms < $2 ORDER BY start_ms",
            BOOKING_COLUMNS
        ))
        .bind(from_ms)
        .bind(to_ms)
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to list bookings: {}", e);
            DbError::QueryError(e.to_string())
        })
    }

    async fn list_all(&self) -> Result<Vec<Booking>, DbError> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings ORDER BY start_ms",
            BOOKING_COLUMNS
        ))
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to list bookings: {}", e);
            DbError::QueryError(e.to_string())
        })
    }

    async fn count(&self) -> Result<i64, DbError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings")
            .fetch_one(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to count bookings: {}", e);
                DbError::QueryError(e.to_string())
            })
    }
}
