#[cfg(test)]
mod tests {
    use crate::repositories::interviewers::{InterviewerRepository, NewInterviewer};
    use crate::repositories::interviewers_sql::SqlInterviewerRepository;
    use crate::repositories::slots::{NewSlot, ReplaceWindow, SlotRepository};
    use crate::repositories::slots_sql::SqlSlotRepository;
    use crate::DbClient;

    const GRAIN_MS: i64 = 30 * 60 * 1000;

    async fn setup() -> (DbClient, SqlSlotRepository, SqlInterviewerRepository) {
        let client = DbClient::from_url("sqlite::memory:")
            .await
            .expect("in-memory database");
        let slots = SqlSlotRepository::new(client.clone());
        let interviewers = SqlInterviewerRepository::new(client.clone());
        slots.init_schema().await.expect("slots schema");
        interviewers.init_schema().await.expect("interviewers schema");
        (client, slots, interviewers)
    }

    fn slot(start_ms: i64) -> NewSlot {
        NewSlot {
            start_ms,
            end_ms: start_ms + GRAIN_MS,
        }
    }

    fn interviewer(name: &str, email: &str, department: &str) -> NewInterviewer {
        NewInterviewer {
            name: name.to_string(),
            email: email.to_string(),
            department: department.to_string(),
            calendar_connected: false,
        }
    }

    async fn mark_booked(client: &DbClient, email: &str, start_ms: i64) {
        sqlx::query("UPDATE slots SET is_booked = 1 WHERE interviewer_email = $1 AND start_ms = $2")
            .bind(email)
            .bind(start_ms)
            .execute(client.pool())
            .await
            .expect("mark slot booked");
    }

    #[tokio::test]
    async fn test_bulk_declare_is_idempotent() {
        let (_client, slots, _) = setup().await;

        let created = slots
            .bulk_declare("alice@example.com", &[slot(0), slot(GRAIN_MS)])
            .await
            .unwrap();
        assert_eq!(created, 2);

        // Re-declaring the identical set inserts nothing new
        let created = slots
            .bulk_declare("alice@example.com", &[slot(0), slot(GRAIN_MS)])
            .await
            .unwrap();
        assert_eq!(created, 0);

        let counts = slots.counts().await.unwrap();
        assert_eq!(counts.total, 2, "duplicate declare must not add rows");
    }

    #[tokio::test]
    async fn test_identical_window_allowed_across_interviewers() {
        let (_client, slots, _) = setup().await;

        slots
            .bulk_declare("alice@example.com", &[slot(0)])
            .await
            .unwrap();
        let created = slots
            .bulk_declare("bob@example.com", &[slot(0)])
            .await
            .unwrap();

        assert_eq!(created, 1, "uniqueness is per interviewer");
        assert_eq!(slots.counts().await.unwrap().total, 2);
    }

    #[tokio::test]
    async fn test_delete_range_keeps_booked_slots() {
        let (client, slots, _) = setup().await;

        slots
            .bulk_declare("alice@example.com", &[slot(0), slot(GRAIN_MS)])
            .await
            .unwrap();
        mark_booked(&client, "alice@example.com", 0).await;

        let deleted = slots
            .delete_unbooked_range("alice@example.com", 0, 2 * GRAIN_MS)
            .await
            .unwrap();

        assert_eq!(deleted, 1, "only the unbooked slot goes");
        let counts = slots.counts().await.unwrap();
        assert_eq!(counts.total, 1);
        assert_eq!(counts.booked, 1, "the booked slot is the audit record");
    }

    #[tokio::test]
    async fn test_delete_range_only_touches_owner() {
        let (_client, slots, _) = setup().await;

        slots
            .bulk_declare("alice@example.com", &[slot(0)])
            .await
            .unwrap();
        slots
            .bulk_declare("bob@example.com", &[slot(0)])
            .await
            .unwrap();

        let deleted = slots
            .delete_unbooked_range("alice@example.com", 0, GRAIN_MS)
            .await
            .unwrap();

        assert_eq!(deleted, 1);
        let remaining = slots.open_slots(0, None).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].interviewer_email, "bob@example.com");
    }

    #[tokio::test]
    async fn test_replace_windows_preserves_booked_slots() {
        let (client, slots, _) = setup().await;

        slots
            .bulk_declare("alice@example.com", &[slot(0), slot(GRAIN_MS)])
            .await
            .unwrap();
        mark_booked(&client, "alice@example.com", 0).await;

        // Reset the whole day to a single later slot
        let outcome = slots
            .replace_windows(
                "alice@example.com",
                &[ReplaceWindow {
                    from_ms: 0,
                    to_ms: 10 * GRAIN_MS,
                    slots: vec![slot(4 * GRAIN_MS)],
                }],
            )
            .await
            .unwrap();

        assert_eq!(outcome.removed, 1, "only the unbooked slot is removed");
        assert_eq!(outcome.created, 1);

        let counts = slots.counts().await.unwrap();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.booked, 1);

        let open = slots
            .open_slots_for_interviewer("alice@example.com", 0)
            .await
            .unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].start_ms, 4 * GRAIN_MS);
    }

    #[tokio::test]
    async fn test_replace_window_skips_slot_colliding_with_booked() {
        let (client, slots, _) = setup().await;

        slots
            .bulk_declare("alice@example.com", &[slot(0)])
            .await
            .unwrap();
        mark_booked(&client, "alice@example.com", 0).await;

        // The replacement declares the booked window again; it must be skipped
        let outcome = slots
            .replace_windows(
                "alice@example.com",
                &[ReplaceWindow {
                    from_ms: 0,
                    to_ms: 2 * GRAIN_MS,
                    slots: vec![slot(0), slot(GRAIN_MS)],
                }],
            )
            .await
            .unwrap();

        assert_eq!(outcome.removed, 0);
        assert_eq!(outcome.created, 1, "colliding replacement is skipped");
        assert_eq!(slots.counts().await.unwrap().booked, 1);
    }

    #[tokio::test]
    async fn test_open_candidates_filtered_by_department() {
        let (_client, slots, interviewers) = setup().await;

        interviewers
            .upsert(&interviewer("Alice", "alice@example.com", "engineering"))
            .await
            .unwrap();
        interviewers
            .upsert(&interviewer("Bob", "bob@example.com", "design"))
            .await
            .unwrap();
        slots
            .bulk_declare("alice@example.com", &[slot(GRAIN_MS)])
            .await
            .unwrap();
        slots
            .bulk_declare("bob@example.com", &[slot(GRAIN_MS)])
            .await
            .unwrap();

        let all = slots.open_candidates_at(GRAIN_MS, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let engineering = slots
            .open_candidates_at(GRAIN_MS, Some("engineering"))
            .await
            .unwrap();
        assert_eq!(engineering.len(), 1);
        assert_eq!(engineering[0].interviewer_email, "alice@example.com");

        let sales = slots
            .open_candidates_at(GRAIN_MS, Some("sales"))
            .await
            .unwrap();
        assert!(sales.is_empty());
    }

    #[tokio::test]
    async fn test_open_slots_respects_lower_bound_and_order() {
        let (_client, slots, _) = setup().await;

        slots
            .bulk_declare(
                "alice@example.com",
                &[slot(2 * GRAIN_MS), slot(0), slot(GRAIN_MS)],
            )
            .await
            .unwrap();

        let open = slots.open_slots(GRAIN_MS, None).await.unwrap();

        assert_eq!(open.len(), 2, "slot starting before the bound is excluded");
        assert_eq!(open[0].start_ms, GRAIN_MS);
        assert_eq!(open[1].start_ms, 2 * GRAIN_MS);
    }

    #[tokio::test]
    async fn test_counts_for_interviewer_scoped_to_owner() {
        let (client, slots, _) = setup().await;

        slots
            .bulk_declare("alice@example.com", &[slot(0), slot(GRAIN_MS)])
            .await
            .unwrap();
        slots
            .bulk_declare("bob@example.com", &[slot(0)])
            .await
            .unwrap();
        mark_booked(&client, "alice@example.com", 0).await;

        let alice = slots
            .counts_for_interviewer("alice@example.com")
            .await
            .unwrap();
        assert_eq!(alice.total, 2);
        assert_eq!(alice.booked, 1);

        let nobody = slots
            .counts_for_interviewer("carol@example.com")
            .await
            .unwrap();
        assert_eq!(nobody.total, 0);
        assert_eq!(nobody.booked, 0);
    }
}
