// --- File: crates/slotwise_scheduling/src/admin.rs ---
//! Admin read-side and registry writes.
//!
//! Aggregates for the operations dashboard, the interviewer and student
//! listings, the booked-interviews report, and the two write paths standing
//! at the membership boundary: roster import and interviewer registration.

use crate::eligibility::normalize_phone;
use crate::error::SchedulingError;
use crate::slots;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use slotwise_config::AppConfig;
use slotwise_db::{
    BookingRepository, Interviewer, InterviewerRepository, NewInterviewer, NewRosterStudent,
    RosterRepository, SlotRepository, SqlBookingRepository, SqlInterviewerRepository,
    SqlRosterRepository, SqlSlotRepository,
};
use std::collections::{HashMap, HashSet};

/// Headline counts for the dashboard.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardTotals {
    pub students: i64,
    pub interviewers: i64,
    pub slots: i64,
    pub booked_slots: i64,
    pub available_slots: i64,
}

/// Interviews scheduled on one upcoming day.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: String,
    pub interviews: i64,
}

/// The operations dashboard.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub totals: DashboardTotals,
    /// Booked share of all declared slots, rendered like `"42%"`.
    pub booking_rate: String,
    /// Today, tomorrow and the day after, in the reference timezone.
    pub daily: Vec<DailyCount>,
}

/// One interviewer with their slot and interview load.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct InterviewerSummary {
    pub name: String,
    pub email: String,
    pub department: String,
    pub calendar_connected: bool,
    pub open_slots: i64,
    pub booked_slots: i64,
    pub interviews_today: i64,
}

/// A roster entry with its booking status.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct StudentRecord {
    pub application_id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub has_booked: bool,
}

/// One row of the booked-interviews report.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct BookedInterview {
    pub application_id: Option<String>,
    pub interviewee: String,
    pub phone: String,
    pub interviewer: String,
    /// Interview start, RFC3339 in the reference timezone.
    pub interview_date: String,
    pub meeting_link: Option<String>,
}

/// One roster row to import.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize)]
pub struct ImportStudent {
    #[serde(default)]
    pub application_id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
}

/// Body of the roster import endpoint.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize)]
pub struct ImportStudentsRequest {
    pub students: Vec<ImportStudent>,
}

/// A row the import refused, with the reason.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedStudent {
    /// 1-based position in the submitted list.
    pub row: usize,
    pub reason: String,
}

/// What the import did.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub imported: u64,
    pub skipped: Vec<SkippedStudent>,
}

/// Body of the interviewer registration endpoint.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize)]
pub struct RegisterInterviewerRequest {
    pub name: String,
    pub email: String,
    pub department: String,
    #[serde(default)]
    pub calendar_connected: bool,
}

/// The interviewer row as registered.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisteredInterviewer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub department: String,
    pub calendar_connected: bool,
}

impl From<Interviewer> for RegisteredInterviewer {
    fn from(interviewer: Interviewer) -> Self {
        Self {
            id: interviewer.id,
            name: interviewer.name,
            email: interviewer.email,
            department: interviewer.department,
            calendar_connected: interviewer.calendar_connected,
        }
    }
}

/// Booked share of all slots rendered as a whole-percent string.
pub fn booking_rate(total_slots: i64, booked_slots: i64) -> String {
    if total_slots == 0 {
        return "0%".to_string();
    }
    let percent = (booked_slots as f64 / total_slots as f64 * 100.0).round() as i64;
    format!("{}%", percent)
}

/// Assemble the dashboard: headline totals, the booking rate, and interview
/// counts for the next three days.
pub async fn dashboard(
    store: &SqlSlotRepository,
    bookings: &SqlBookingRepository,
    roster: &SqlRosterRepository,
    interviewers: &SqlInterviewerRepository,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> Result<DashboardResponse, SchedulingError> {
    let zone = slots::reference_zone(&config.scheduling);
    let students = roster.count().await?;
    let interviewer_count = interviewers.count().await?;
    let slot_counts = store.counts().await?;

    let today = now.with_timezone(&zone).date_naive();
    let mut daily = Vec::with_capacity(3);
    for offset in 0..3 {
        let date = (today + Duration::days(offset)).format("%Y-%m-%d").to_string();
        let Some((from, to)) = slots::day_bounds(&date, zone) else {
            continue;
        };
        let interviews = bookings
            .list_between(from.timestamp_millis(), to.timestamp_millis())
            .await?
            .len() as i64;
        daily.push(DailyCount { date, interviews });
    }

    Ok(DashboardResponse {
        totals: DashboardTotals {
            students,
            interviewers: interviewer_count,
            slots: slot_counts.total,
            booked_slots: slot_counts.booked,
            available_slots: slot_counts.total - slot_counts.booked,
        },
        booking_rate: booking_rate(slot_counts.total, slot_counts.booked),
        daily,
    })
}

/// Every registered interviewer with slot counts and today's interview load.
pub async fn interviewer_summaries(
    store: &SqlSlotRepository,
    bookings: &SqlBookingRepository,
    interviewers: &SqlInterviewerRepository,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> Result<Vec<InterviewerSummary>, SchedulingError> {
    let zone = slots::reference_zone(&config.scheduling);
    let today = slots::local_date(now, zone);
    let today_bookings = match slots::day_bounds(&today, zone) {
        Some((from, to)) => {
            bookings
                .list_between(from.timestamp_millis(), to.timestamp_millis())
                .await?
        }
        None => Vec::new(),
    };

    let mut summaries = Vec::new();
    for interviewer in interviewers.list_all().await? {
        let counts = store.counts_for_interviewer(&interviewer.email).await?;
        let interviews_today = today_bookings
            .iter()
            .filter(|booking| booking.interviewer_email == interviewer.email)
            .count() as i64;
        summaries.push(InterviewerSummary {
            name: interviewer.name,
            email: interviewer.email,
            department: interviewer.department,
            calendar_connected: interviewer.calendar_connected,
            open_slots: counts.total - counts.booked,
            booked_slots: counts.booked,
            interviews_today,
        });
    }
    Ok(summaries)
}

/// The roster with each student's booking status, matched by email or phone.
pub async fn student_records(
    roster: &SqlRosterRepository,
    bookings: &SqlBookingRepository,
) -> Result<Vec<StudentRecord>, SchedulingError> {
    let mut booked_emails = HashSet::new();
    let mut booked_phones = HashSet::new();
    for booking in bookings.list_all().await? {
        booked_emails.insert(booking.student_email.to_lowercase());
        booked_phones.insert(booking.student_phone);
    }

    let records = roster
        .list_all()
        .await?
        .into_iter()
        .map(|student| {
            let has_booked = booked_emails.contains(&student.email.to_lowercase())
                || normalize_phone(&student.phone)
                    .is_some_and(|phone| booked_phones.contains(&phone));
            StudentRecord {
                application_id: student.application_id,
                name: student.name,
                email: student.email,
                phone: student.phone,
                department: student.department,
                has_booked,
            }
        })
        .collect();
    Ok(records)
}

/// Every booking joined with its roster row (by email, falling back to
/// phone) and the interviewer's display name.
pub async fn booked_interviews(
    bookings: &SqlBookingRepository,
    roster: &SqlRosterRepository,
    interviewers: &SqlInterviewerRepository,
    config: &AppConfig,
) -> Result<Vec<BookedInterview>, SchedulingError> {
    let zone = slots::reference_zone(&config.scheduling);
    let roster_rows = roster.list_all().await?;
    let interviewer_names: HashMap<String, String> = interviewers
        .list_all()
        .await?
        .into_iter()
        .map(|interviewer| (interviewer.email, interviewer.name))
        .collect();

    let mut by_email = HashMap::new();
    let mut by_phone = HashMap::new();
    for student in &roster_rows {
        by_email.insert(student.email.to_lowercase(), student);
        if let Some(phone) = normalize_phone(&student.phone) {
            by_phone.insert(phone, student);
        }
    }

    let mut report = Vec::new();
    for booking in bookings.list_all().await? {
        let matched = by_email
            .get(&booking.student_email.to_lowercase())
            .or_else(|| by_phone.get(booking.student_phone.as_str()));
        report.push(BookedInterview {
            application_id: matched.and_then(|student| student.application_id.clone()),
            interviewee: booking.student_name,
            phone: booking.student_phone,
            interviewer: interviewer_names
                .get(&booking.interviewer_email)
                .cloned()
                .unwrap_or(booking.interviewer_email),
            interview_date: slots::render_instant(booking.start_ms, zone),
            meeting_link: booking.meeting_link,
        });
    }
    Ok(report)
}

/// Import roster rows, upserting by normalized phone.
///
/// Rows that fail validation are skipped and reported back with their
/// position; only an entirely empty submission is rejected outright.
pub async fn import_students(
    roster: &SqlRosterRepository,
    request: &ImportStudentsRequest,
) -> Result<ImportOutcome, SchedulingError> {
    if request.students.is_empty() {
        return Err(SchedulingError::Validation(
            "at least one student is required".to_string(),
        ));
    }

    let mut valid = Vec::new();
    let mut skipped = Vec::new();
    for (index, row) in request.students.iter().enumerate() {
        let row_number = index + 1;
        let name = row.name.trim();
        if name.is_empty() {
            skipped.push(SkippedStudent {
                row: row_number,
                reason: "name is required".to_string(),
            });
            continue;
        }
        let email = row.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            skipped.push(SkippedStudent {
                row: row_number,
                reason: "a valid email is required".to_string(),
            });
            continue;
        }
        let Some(phone) = normalize_phone(&row.phone) else {
            skipped.push(SkippedStudent {
                row: row_number,
                reason: "phone must contain at least ten digits".to_string(),
            });
            continue;
        };
        let department = row.department.trim();
        if department.is_empty() {
            skipped.push(SkippedStudent {
                row: row_number,
                reason: "department is required".to_string(),
            });
            continue;
        }
        valid.push(NewRosterStudent {
            application_id: row
                .application_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            name: name.to_string(),
            email,
            phone,
            department: department.to_lowercase(),
        });
    }

    let imported = if valid.is_empty() {
        0
    } else {
        roster.upsert_students(&valid).await?
    };
    Ok(ImportOutcome { imported, skipped })
}

/// Register an interviewer, updating the row if the email is already known.
pub async fn register_interviewer(
    interviewers: &SqlInterviewerRepository,
    request: &RegisterInterviewerRequest,
) -> Result<RegisteredInterviewer, SchedulingError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(SchedulingError::Validation("name is required".to_string()));
    }
    let email = request.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(SchedulingError::Validation(
            "a valid email is required".to_string(),
        ));
    }
    let department = request.department.trim();
    if department.is_empty() {
        return Err(SchedulingError::Validation(
            "department is required".to_string(),
        ));
    }

    let interviewer = interviewers
        .upsert(&NewInterviewer {
            name: name.to_string(),
            email,
            department: department.to_lowercase(),
            calendar_connected: request.calendar_connected,
        })
        .await?;
    Ok(RegisteredInterviewer::from(interviewer))
}
