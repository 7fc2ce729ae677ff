// --- File: crates/slotwise_scheduling/src/availability.rs ---
//! Availability operations.
//!
//! Interviewer-facing writes (declare, replace, delete) plus the two read
//! transforms: the owner's consolidated per-day listing and the public view
//! students browse before booking. All wall-clock interpretation goes through
//! the configured reference timezone; the store itself only sees absolute
//! millisecond instants.

use crate::eligibility;
use crate::error::SchedulingError;
use crate::slots;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use slotwise_config::AppConfig;
use slotwise_db::{
    NewSlot, ReplaceWindow, SlotRepository, SqlRosterRepository, SqlSlotRepository,
};
use std::collections::BTreeMap;
use tracing::debug;

/// One declared wall-clock range on one calendar date.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AvailabilityRange {
    /// Calendar date, `YYYY-MM-DD`, in the reference timezone.
    pub date: String,
    /// Wall-clock range start, `HH:MM`.
    pub start_time: String,
    /// Wall-clock range end, exclusive.
    pub end_time: String,
}

/// Body of the batch declare endpoints.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeclareRequest {
    pub ranges: Vec<AvailabilityRange>,
}

/// Body of the replace endpoint. Each entry resets one calendar day.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize)]
pub struct ReplaceRequest {
    pub days: Vec<AvailabilityRange>,
}

/// How many slots a declare or replace actually created.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct SlotsCreatedResponse {
    pub slots_created: u64,
}

/// Query bounds for range deletion, RFC3339.
#[derive(Debug, Deserialize)]
pub struct DeleteRangeQuery {
    pub from: String,
    pub to: String,
}

/// How many slots a range deletion removed.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}

/// A displayed wall-clock range, `HH:MM` in the reference timezone.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_time: String,
    pub end_time: String,
}

/// One day of an interviewer's own availability, consecutive slots merged.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: String,
    pub ranges: Vec<TimeRange>,
}

/// A bookable time in the public view, RFC3339 in the reference timezone.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicSlot {
    pub start_time: String,
    pub end_time: String,
}

/// Declare availability on future dates within the booking horizon.
///
/// Dates beyond the horizon (or already past) contribute nothing and are
/// skipped rather than failing the whole batch; slots that already exist are
/// skipped by the store. The request fails only when no range yields a
/// single bookable candidate.
pub async fn declare_future(
    store: &SqlSlotRepository,
    config: &AppConfig,
    interviewer_email: &str,
    request: &DeclareRequest,
    now: DateTime<Utc>,
) -> Result<SlotsCreatedResponse, SchedulingError> {
    let zone = slots::reference_zone(&config.scheduling);
    let grain = slots::slot_grain(&config.scheduling);
    let today = now.with_timezone(&zone).date_naive();
    let horizon_end = today + Duration::days(i64::from(config.scheduling.horizon_days));

    let mut candidates: Vec<NewSlot> = Vec::new();
    for range in &request.ranges {
        let Some(date) = slots::parse_date(&range.date) else {
            return Err(SchedulingError::Validation(format!(
                "invalid date '{}', expected YYYY-MM-DD",
                range.date
            )));
        };
        if date < today || date > horizon_end {
            debug!("Skipping out-of-horizon date {}", range.date);
            continue;
        }
        for window in slots::generate_slots(
            &range.date,
            &range.start_time,
            &range.end_time,
            now,
            zone,
            grain,
        ) {
            candidates.push(window.to_new_slot());
        }
    }

    if candidates.is_empty() {
        return Err(SchedulingError::Validation(
            "no bookable future slots in the declared ranges".to_string(),
        ));
    }

    let created = store.bulk_declare(interviewer_email, &candidates).await?;
    Ok(SlotsCreatedResponse {
        slots_created: created,
    })
}

/// Declare availability restricted to the current date in the reference zone.
///
/// Any range naming another date fails the whole request; the in-day past is
/// still filtered slot by slot.
pub async fn declare_today(
    store: &SqlSlotRepository,
    config: &AppConfig,
    interviewer_email: &str,
    request: &DeclareRequest,
    now: DateTime<Utc>,
) -> Result<SlotsCreatedResponse, SchedulingError> {
    let zone = slots::reference_zone(&config.scheduling);
    let grain = slots::slot_grain(&config.scheduling);
    let today = slots::local_date(now, zone);

    let mut candidates: Vec<NewSlot> = Vec::new();
    for range in &request.ranges {
        if range.date.trim() != today {
            return Err(SchedulingError::Validation(format!(
                "date must be today ({}), got '{}'",
                today, range.date
            )));
        }
        for window in slots::generate_slots(
            &range.date,
            &range.start_time,
            &range.end_time,
            now,
            zone,
            grain,
        ) {
            candidates.push(window.to_new_slot());
        }
    }

    if candidates.is_empty() {
        return Err(SchedulingError::Validation(
            "no bookable slots remain today in the declared ranges".to_string(),
        ));
    }

    let created = store.bulk_declare(interviewer_email, &candidates).await?;
    Ok(SlotsCreatedResponse {
        slots_created: created,
    })
}

/// Reset whole days to a new declared range, atomically.
///
/// For each named day the interviewer's unbooked slots are deleted and the
/// replacement set inserted in one transaction; booked slots stay. A range
/// that generates nothing still clears the day, so an empty replacement is
/// legitimate and only an empty `days` list is rejected.
pub async fn replace_days(
    store: &SqlSlotRepository,
    config: &AppConfig,
    interviewer_email: &str,
    request: &ReplaceRequest,
    now: DateTime<Utc>,
) -> Result<SlotsCreatedResponse, SchedulingError> {
    if request.days.is_empty() {
        return Err(SchedulingError::Validation(
            "at least one day is required".to_string(),
        ));
    }

    let zone = slots::reference_zone(&config.scheduling);
    let grain = slots::slot_grain(&config.scheduling);

    // Entries naming the same date collapse into one window so a later entry
    // cannot wipe out an earlier entry's replacements.
    let mut windows: BTreeMap<i64, ReplaceWindow> = BTreeMap::new();
    for day in &request.days {
        let Some((from, to)) = slots::day_bounds(&day.date, zone) else {
            return Err(SchedulingError::Validation(format!(
                "invalid date '{}', expected YYYY-MM-DD",
                day.date
            )));
        };
        let replacement: Vec<NewSlot> =
            slots::generate_slots(&day.date, &day.start_time, &day.end_time, now, zone, grain)
                .into_iter()
                .map(|window| window.to_new_slot())
                .collect();

        windows
            .entry(from.timestamp_millis())
            .and_modify(|window| window.slots.extend(replacement.iter().copied()))
            .or_insert_with(|| ReplaceWindow {
                from_ms: from.timestamp_millis(),
                to_ms: to.timestamp_millis(),
                slots: replacement,
            });
    }

    let windows: Vec<ReplaceWindow> = windows.into_values().collect();
    let outcome = store.replace_windows(interviewer_email, &windows).await?;
    debug!(
        "Replaced {} days for {}: removed {}, created {}",
        windows.len(),
        interviewer_email,
        outcome.removed,
        outcome.created
    );
    Ok(SlotsCreatedResponse {
        slots_created: outcome.created,
    })
}

/// Delete the interviewer's unbooked slots lying wholly within `[from, to]`.
///
/// Malformed or inverted bounds are a validation failure; a well-formed
/// range that matches nothing is reported as not found so callers can tell
/// "bad request" apart from "nothing there".
pub async fn delete_range(
    store: &SqlSlotRepository,
    interviewer_email: &str,
    query: &DeleteRangeQuery,
) -> Result<DeletedResponse, SchedulingError> {
    let from = parse_instant(&query.from, "from")?;
    let to = parse_instant(&query.to, "to")?;
    if from >= to {
        return Err(SchedulingError::Validation(
            "'from' must be earlier than 'to'".to_string(),
        ));
    }

    let deleted = store
        .delete_unbooked_range(
            interviewer_email,
            from.timestamp_millis(),
            to.timestamp_millis(),
        )
        .await?;
    if deleted == 0 {
        return Err(SchedulingError::NotFound(
            "no unbooked slots in the given range".to_string(),
        ));
    }
    Ok(DeletedResponse { deleted })
}

/// The interviewer's own forward-looking open slots, grouped by day with
/// consecutive slots merged into displayed ranges.
pub async fn list_consolidated(
    store: &SqlSlotRepository,
    config: &AppConfig,
    interviewer_email: &str,
    now: DateTime<Utc>,
) -> Result<Vec<DayAvailability>, SchedulingError> {
    let zone = slots::reference_zone(&config.scheduling);
    let open = store
        .open_slots_for_interviewer(interviewer_email, now.timestamp_millis())
        .await?;

    let mut days: Vec<DayAvailability> = Vec::new();
    let mut previous_end_ms = i64::MIN;
    for slot in open {
        let start = slots::instant_from_millis(slot.start_ms);
        let end = slots::instant_from_millis(slot.end_ms);
        let date = slots::local_date(start, zone);
        let range = TimeRange {
            start_time: slots::local_clock(start, zone),
            end_time: slots::local_clock(end, zone),
        };

        match days.last_mut() {
            Some(day) if day.date == date => match day.ranges.last_mut() {
                // A slot beginning where the previous one ended extends the
                // displayed range instead of opening a new one.
                Some(last) if slot.start_ms == previous_end_ms => {
                    last.end_time = range.end_time;
                }
                _ => day.ranges.push(range),
            },
            _ => days.push(DayAvailability {
                date,
                ranges: vec![range],
            }),
        }
        previous_end_ms = slot.end_ms;
    }
    Ok(days)
}

/// The public availability view: distinct open slot times within the booking
/// horizon, grouped by date in the reference timezone.
///
/// With department affinity enabled the caller must identify themselves by
/// phone; the resolved roster department then restricts the pool, and an
/// unresolved phone is rejected rather than shown the global pool.
pub async fn public_availability(
    store: &SqlSlotRepository,
    roster: &SqlRosterRepository,
    config: &AppConfig,
    phone: Option<&str>,
    now: DateTime<Utc>,
) -> Result<BTreeMap<String, Vec<PublicSlot>>, SchedulingError> {
    let zone = slots::reference_zone(&config.scheduling);

    let department = if config.scheduling.department_affinity {
        let phone = phone.ok_or_else(|| {
            SchedulingError::Validation(
                "phone is required to view availability".to_string(),
            )
        })?;
        let student = eligibility::resolve_student(roster, phone)
            .await?
            .ok_or(SchedulingError::NotAuthorized)?;
        Some(student.department)
    } else {
        None
    };

    let horizon_ms = (now + Duration::days(i64::from(config.scheduling.horizon_days)))
        .timestamp_millis();
    let open = store
        .open_slots(now.timestamp_millis(), department.as_deref())
        .await?;

    let mut grouped: BTreeMap<String, Vec<PublicSlot>> = BTreeMap::new();
    let mut previous: Option<(i64, i64)> = None;
    for slot in open {
        if slot.start_ms > horizon_ms {
            break;
        }
        // Interviewers offering the same window collapse into one entry.
        if previous == Some((slot.start_ms, slot.end_ms)) {
            continue;
        }
        previous = Some((slot.start_ms, slot.end_ms));

        let date = slots::local_date(slots::instant_from_millis(slot.start_ms), zone);
        grouped.entry(date).or_default().push(PublicSlot {
            start_time: slots::render_instant(slot.start_ms, zone),
            end_time: slots::render_instant(slot.end_ms, zone),
        });
    }
    Ok(grouped)
}

fn parse_instant(input: &str, field: &str) -> Result<DateTime<Utc>, SchedulingError> {
    DateTime::parse_from_rfc3339(input.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            SchedulingError::Validation(format!("invalid '{}' instant, expected RFC3339", field))
        })
}
