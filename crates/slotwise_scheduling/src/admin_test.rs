#[cfg(test)]
mod tests {
    use crate::admin::{
        booked_interviews, booking_rate, dashboard, import_students, interviewer_summaries,
        register_interviewer, student_records, ImportStudent, ImportStudentsRequest,
        RegisterInterviewerRequest, SkippedStudent,
    };
    use crate::error::SchedulingError;
    use chrono::{DateTime, TimeZone, Utc};
    use chrono_tz::Tz;
    use slotwise_config::{AppConfig, SchedulingConfig, ServerConfig};
    use slotwise_db::{
        BookingRepository, ClaimOutcome, ClaimRequest, DbClient, InterviewerRepository,
        NewInterviewer, NewRosterStudent, NewSlot, RosterRepository, SlotRepository,
        SqlBookingRepository, SqlInterviewerRepository, SqlRosterRepository, SqlSlotRepository,
    };

    struct Ctx {
        store: SqlSlotRepository,
        bookings: SqlBookingRepository,
        roster: SqlRosterRepository,
        interviewers: SqlInterviewerRepository,
        config: AppConfig,
    }

    async fn setup() -> Ctx {
        let client = DbClient::from_url("sqlite::memory:")
            .await
            .expect("in-memory database");
        let store = SqlSlotRepository::new(client.clone());
        let bookings = SqlBookingRepository::new(client.clone());
        let roster = SqlRosterRepository::new(client.clone());
        let interviewers = SqlInterviewerRepository::new(client.clone());
        store.init_schema().await.expect("slots schema");
        bookings.init_schema().await.expect("bookings schema");
        roster.init_schema().await.expect("roster schema");
        interviewers.init_schema().await.expect("interviewers schema");
        Ctx {
            store,
            bookings,
            roster,
            interviewers,
            config: AppConfig {
                server: ServerConfig {
                    host: "127.0.0.1".to_string(),
                    port: 8080,
                },
                use_gcal: false,
                database: None,
                scheduling: SchedulingConfig::default(),
                gcal: None,
            },
        }
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Tz::Asia__Kolkata
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .expect("unambiguous Kolkata time")
            .with_timezone(&Utc)
    }

    async fn declare(ctx: &Ctx, email: &str, starts: &[DateTime<Utc>]) {
        let slots: Vec<NewSlot> = starts
            .iter()
            .map(|start| NewSlot {
                start_ms: start.timestamp_millis(),
                end_ms: (*start + chrono::Duration::minutes(30)).timestamp_millis(),
            })
            .collect();
        ctx.store.bulk_declare(email, &slots).await.expect("declare");
    }

    async fn claim(ctx: &Ctx, name: &str, email: &str, phone: &str, start: DateTime<Utc>) {
        let outcome = ctx
            .bookings
            .claim(
                &ClaimRequest {
                    student_name: name,
                    student_email: email,
                    student_phone: phone,
                    start_ms: start.timestamp_millis(),
                    department: None,
                    created_at_ms: start.timestamp_millis(),
                },
                &|_| 0,
            )
            .await
            .expect("claim");
        assert!(matches!(outcome, ClaimOutcome::Booked(_)));
    }

    fn student(name: &str, email: &str, phone: &str) -> NewRosterStudent {
        NewRosterStudent {
            application_id: None,
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            department: "engineering".to_string(),
        }
    }

    #[test]
    fn test_booking_rate_formatting() {
        assert_eq!(booking_rate(0, 0), "0%");
        assert_eq!(booking_rate(2, 1), "50%");
        assert_eq!(booking_rate(3, 1), "33%");
        assert_eq!(booking_rate(3, 2), "67%");
        assert_eq!(booking_rate(4, 4), "100%");
    }

    #[tokio::test]
    async fn test_dashboard_totals_rate_and_next_three_days() {
        let ctx = setup().await;
        let now = at(2026, 3, 1, 8, 0);
        ctx.roster
            .upsert_students(&[
                student("Priya Sharma", "priya@example.com", "9876543210"),
                student("Dev Patel", "dev@example.com", "9111111111"),
            ])
            .await
            .unwrap();
        ctx.interviewers
            .upsert(&NewInterviewer {
                name: "Alice Rao".to_string(),
                email: "alice@example.com".to_string(),
                department: "engineering".to_string(),
                calendar_connected: false,
            })
            .await
            .unwrap();
        declare(
            &ctx,
            "alice@example.com",
            &[
                at(2026, 3, 1, 9, 0),
                at(2026, 3, 2, 9, 0),
                at(2026, 3, 2, 9, 30),
                at(2026, 3, 3, 9, 0),
            ],
        )
        .await;
        claim(
            &ctx,
            "Priya Sharma",
            "priya@example.com",
            "9876543210",
            at(2026, 3, 1, 9, 0),
        )
        .await;
        claim(
            &ctx,
            "Dev Patel",
            "dev@example.com",
            "9111111111",
            at(2026, 3, 2, 9, 0),
        )
        .await;

        let response = dashboard(
            &ctx.store,
            &ctx.bookings,
            &ctx.roster,
            &ctx.interviewers,
            &ctx.config,
            now,
        )
        .await
        .unwrap();

        assert_eq!(response.totals.students, 2);
        assert_eq!(response.totals.interviewers, 1);
        assert_eq!(response.totals.slots, 4);
        assert_eq!(response.totals.booked_slots, 2);
        assert_eq!(response.totals.available_slots, 2);
        assert_eq!(response.booking_rate, "50%");

        assert_eq!(response.daily.len(), 3);
        assert_eq!(response.daily[0].date, "2026-03-01");
        assert_eq!(response.daily[0].interviews, 1);
        assert_eq!(response.daily[1].date, "2026-03-02");
        assert_eq!(response.daily[1].interviews, 1);
        assert_eq!(response.daily[2].date, "2026-03-03");
        assert_eq!(response.daily[2].interviews, 0);
    }

    #[tokio::test]
    async fn test_interviewer_summaries_count_slots_and_todays_interviews() {
        let ctx = setup().await;
        let now = at(2026, 3, 1, 8, 0);
        for (name, email, department) in [
            ("Alice Rao", "alice@example.com", "engineering"),
            ("Bob Verma", "bob@example.com", "design"),
        ] {
            ctx.interviewers
                .upsert(&NewInterviewer {
                    name: name.to_string(),
                    email: email.to_string(),
                    department: department.to_string(),
                    calendar_connected: false,
                })
                .await
                .unwrap();
        }
        declare(
            &ctx,
            "alice@example.com",
            &[at(2026, 3, 1, 9, 0), at(2026, 3, 2, 9, 0)],
        )
        .await;
        claim(
            &ctx,
            "Priya Sharma",
            "priya@example.com",
            "9876543210",
            at(2026, 3, 1, 9, 0),
        )
        .await;

        let summaries = interviewer_summaries(
            &ctx.store,
            &ctx.bookings,
            &ctx.interviewers,
            &ctx.config,
            now,
        )
        .await
        .unwrap();

        assert_eq!(summaries.len(), 2);
        let alice = summaries
            .iter()
            .find(|summary| summary.email == "alice@example.com")
            .expect("alice listed");
        assert_eq!(alice.open_slots, 1);
        assert_eq!(alice.booked_slots, 1);
        assert_eq!(alice.interviews_today, 1);

        let bob = summaries
            .iter()
            .find(|summary| summary.email == "bob@example.com")
            .expect("bob listed");
        assert_eq!(bob.open_slots, 0);
        assert_eq!(bob.booked_slots, 0);
        assert_eq!(bob.interviews_today, 0);
    }

    #[tokio::test]
    async fn test_student_records_flag_bookings_by_email_or_phone() {
        let ctx = setup().await;
        ctx.roster
            .upsert_students(&[
                student("Priya Sharma", "priya@example.com", "9876543210"),
                student("Dev Patel", "dev@example.com", "9111111111"),
                student("Mira Iyer", "mira@example.com", "9222222222"),
            ])
            .await
            .unwrap();
        declare(
            &ctx,
            "alice@example.com",
            &[at(2026, 3, 2, 9, 0), at(2026, 3, 2, 9, 30)],
        )
        .await;
        // Matches Priya by email only
        claim(
            &ctx,
            "Priya Sharma",
            "priya@example.com",
            "9999999999",
            at(2026, 3, 2, 9, 0),
        )
        .await;
        // Matches Dev by phone only
        claim(
            &ctx,
            "Dev P",
            "dev.personal@example.com",
            "9111111111",
            at(2026, 3, 2, 9, 30),
        )
        .await;

        let records = student_records(&ctx.roster, &ctx.bookings).await.unwrap();

        assert_eq!(records.len(), 3);
        let booked: Vec<bool> = ["priya@example.com", "dev@example.com", "mira@example.com"]
            .iter()
            .map(|email| {
                records
                    .iter()
                    .find(|record| record.email == *email)
                    .expect("record listed")
                    .has_booked
            })
            .collect();
        assert_eq!(booked, vec![true, true, false]);
    }

    #[tokio::test]
    async fn test_booked_interviews_join_roster_and_interviewer_name() {
        let ctx = setup().await;
        ctx.roster
            .upsert_students(&[NewRosterStudent {
                application_id: Some("APP-001".to_string()),
                name: "Priya Sharma".to_string(),
                email: "priya@example.com".to_string(),
                phone: "9876543210".to_string(),
                department: "engineering".to_string(),
            }])
            .await
            .unwrap();
        ctx.interviewers
            .upsert(&NewInterviewer {
                name: "Alice Rao".to_string(),
                email: "alice@example.com".to_string(),
                department: "engineering".to_string(),
                calendar_connected: false,
            })
            .await
            .unwrap();
        declare(&ctx, "alice@example.com", &[at(2026, 3, 2, 9, 0)]).await;
        claim(
            &ctx,
            "Priya Sharma",
            "priya@example.com",
            "9876543210",
            at(2026, 3, 2, 9, 0),
        )
        .await;
        let booking = ctx
            .bookings
            .find_by_student_email("priya@example.com")
            .await
            .unwrap()
            .expect("booking exists");
        ctx.bookings
            .attach_notification(booking.id, "https://meet.example.com/alice-rao-priya-sharma", None)
            .await
            .unwrap();

        let report = booked_interviews(&ctx.bookings, &ctx.roster, &ctx.interviewers, &ctx.config)
            .await
            .unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].application_id.as_deref(), Some("APP-001"));
        assert_eq!(report[0].interviewee, "Priya Sharma");
        assert_eq!(report[0].interviewer, "Alice Rao");
        assert_eq!(report[0].interview_date, "2026-03-02T09:00:00+05:30");
        assert_eq!(
            report[0].meeting_link.as_deref(),
            Some("https://meet.example.com/alice-rao-priya-sharma")
        );
    }

    #[tokio::test]
    async fn test_import_normalizes_and_reports_skipped_rows() {
        let ctx = setup().await;
        let request = ImportStudentsRequest {
            students: vec![
                ImportStudent {
                    application_id: Some(" APP-001 ".to_string()),
                    name: "Priya Sharma".to_string(),
                    email: "PRIYA@Example.COM".to_string(),
                    phone: "+91 98765-43210".to_string(),
                    department: "Engineering".to_string(),
                },
                ImportStudent {
                    application_id: None,
                    name: "   ".to_string(),
                    email: "x@example.com".to_string(),
                    phone: "9111111111".to_string(),
                    department: "design".to_string(),
                },
                ImportStudent {
                    application_id: None,
                    name: "Dev Patel".to_string(),
                    email: "not-an-email".to_string(),
                    phone: "9222222222".to_string(),
                    department: "design".to_string(),
                },
                ImportStudent {
                    application_id: None,
                    name: "Mira Iyer".to_string(),
                    email: "mira@example.com".to_string(),
                    phone: "123".to_string(),
                    department: "design".to_string(),
                },
            ],
        };

        let outcome = import_students(&ctx.roster, &request).await.unwrap();

        assert_eq!(outcome.imported, 1);
        assert_eq!(
            outcome.skipped,
            vec![
                SkippedStudent {
                    row: 2,
                    reason: "name is required".to_string(),
                },
                SkippedStudent {
                    row: 3,
                    reason: "a valid email is required".to_string(),
                },
                SkippedStudent {
                    row: 4,
                    reason: "phone must contain at least ten digits".to_string(),
                },
            ]
        );

        let stored = ctx
            .roster
            .find_by_phone("9876543210")
            .await
            .unwrap()
            .expect("imported row stored under the normalized phone");
        assert_eq!(stored.email, "priya@example.com");
        assert_eq!(stored.department, "engineering");
        assert_eq!(stored.application_id.as_deref(), Some("APP-001"));
    }

    #[tokio::test]
    async fn test_import_of_nothing_is_rejected() {
        let ctx = setup().await;

        let result = import_students(
            &ctx.roster,
            &ImportStudentsRequest {
                students: Vec::new(),
            },
        )
        .await;

        assert!(matches!(result, Err(SchedulingError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_interviewer_normalizes_and_updates_in_place() {
        let ctx = setup().await;

        let registered = register_interviewer(
            &ctx.interviewers,
            &RegisterInterviewerRequest {
                name: " Alice Rao ".to_string(),
                email: "ALICE@Example.com".to_string(),
                department: "Engineering".to_string(),
                calendar_connected: true,
            },
        )
        .await
        .unwrap();
        assert_eq!(registered.name, "Alice Rao");
        assert_eq!(registered.email, "alice@example.com");
        assert_eq!(registered.department, "engineering");
        assert!(registered.calendar_connected);

        // Same email again: the row is updated, not duplicated
        let updated = register_interviewer(
            &ctx.interviewers,
            &RegisterInterviewerRequest {
                name: "Alice R.".to_string(),
                email: "alice@example.com".to_string(),
                department: "engineering".to_string(),
                calendar_connected: false,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.id, registered.id);
        assert_eq!(updated.name, "Alice R.");
        assert_eq!(ctx.interviewers.count().await.unwrap(), 1);

        let invalid = register_interviewer(
            &ctx.interviewers,
            &RegisterInterviewerRequest {
                name: "No Department".to_string(),
                email: "nobody@example.com".to_string(),
                department: "  ".to_string(),
                calendar_connected: false,
            },
        )
        .await;
        assert!(matches!(invalid, Err(SchedulingError::Validation(_))));
    }
}
