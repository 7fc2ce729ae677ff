// --- File: crates/slotwise_scheduling/src/slots.rs ---
//! Pure slot generation.
//!
//! Expands a declared wall-clock range on one calendar date into discrete
//! fixed-length bookable windows. No I/O and no clock sampling: the caller
//! supplies the reference instant used to filter out the past, so the
//! functions here are deterministic and unit-testable without a clock.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use slotwise_config::SchedulingConfig;
use slotwise_db::NewSlot;
use std::str::FromStr;

/// A candidate bookable window in absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SlotWindow {
    /// The window as unix-millisecond bounds, the form the store persists.
    pub fn to_new_slot(self) -> NewSlot {
        NewSlot {
            start_ms: self.start.timestamp_millis(),
            end_ms: self.end.timestamp_millis(),
        }
    }
}

/// Partition `[start_clock, end_clock)` on `date` into consecutive windows of
/// `grain` length, interpreted in `time_zone`.
///
/// A trailing interval shorter than the grain is discarded, as is any window
/// whose start is at or before `reference_now`. Unparseable inputs, a start
/// at or after the end, and local times made ambiguous or nonexistent by a
/// DST transition all yield an empty vector; the caller treats empty as
/// "nothing to add".
///
/// # Arguments
///
/// * `date` - Calendar date in `YYYY-MM-DD` form
/// * `start_clock` - Wall-clock range start, `HH:MM` (seconds optional)
/// * `end_clock` - Wall-clock range end, exclusive
/// * `reference_now` - Instant that separates the past from the future
/// * `time_zone` - Zone in which the date and clocks are interpreted
/// * `grain` - Fixed window length
pub fn generate_slots(
    date: &str,
    start_clock: &str,
    end_clock: &str,
    reference_now: DateTime<Utc>,
    time_zone: Tz,
    grain: Duration,
) -> Vec<SlotWindow> {
    let Some(day) = parse_date(date) else {
        return Vec::new();
    };
    let (Some(start), Some(end)) = (parse_clock(start_clock), parse_clock(end_clock)) else {
        return Vec::new();
    };
    if grain <= Duration::zero() || start >= end {
        return Vec::new();
    }

    let Some(range_start) = time_zone.from_local_datetime(&day.and_time(start)).single() else {
        return Vec::new();
    };
    let Some(range_end) = time_zone.from_local_datetime(&day.and_time(end)).single() else {
        return Vec::new();
    };

    let mut windows = Vec::new();
    let mut slot_start = range_start;
    loop {
        let slot_end = slot_start + grain;
        if slot_end > range_end {
            break;
        }
        let start_utc = slot_start.with_timezone(&Utc);
        if start_utc > reference_now {
            windows.push(SlotWindow {
                start: start_utc,
                end: slot_end.with_timezone(&Utc),
            });
        }
        slot_start = slot_end;
    }
    windows
}

/// UTC bounds of a calendar date in `time_zone`: local midnight inclusive to
/// the next day's local midnight exclusive.
pub fn day_bounds(date: &str, time_zone: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let day = parse_date(date)?;
    let start = local_midnight(day, time_zone)?;
    let end = local_midnight(day.succ_opt()?, time_zone)?;
    Some((start, end))
}

/// The calendar date of `instant` in `time_zone`, formatted `YYYY-MM-DD`.
pub fn local_date(instant: DateTime<Utc>, time_zone: Tz) -> String {
    instant
        .with_timezone(&time_zone)
        .format("%Y-%m-%d")
        .to_string()
}

/// Wall-clock `HH:MM` of `instant` in `time_zone`.
pub fn local_clock(instant: DateTime<Utc>, time_zone: Tz) -> String {
    instant.with_timezone(&time_zone).format("%H:%M").to_string()
}

/// A stored unix-millisecond instant as a UTC datetime.
pub fn instant_from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

/// RFC3339 rendering of a stored unix-millisecond instant in `time_zone`.
pub fn render_instant(ms: i64, time_zone: Tz) -> String {
    instant_from_millis(ms)
        .with_timezone(&time_zone)
        .to_rfc3339()
}

/// Resolve the configured reference timezone, falling back to Asia/Kolkata
/// when the name does not parse.
pub fn reference_zone(config: &SchedulingConfig) -> Tz {
    Tz::from_str(&config.time_zone).unwrap_or(Tz::Asia__Kolkata)
}

/// The configured slot grain as a duration.
pub fn slot_grain(config: &SchedulingConfig) -> Duration {
    Duration::minutes(i64::from(config.slot_duration_minutes))
}

pub(crate) fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

fn parse_clock(input: &str) -> Option<NaiveTime> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M:%S"))
        .ok()
}

fn local_midnight(day: NaiveDate, time_zone: Tz) -> Option<DateTime<Utc>> {
    day.and_hms_opt(0, 0, 0)
        .and_then(|naive| time_zone.from_local_datetime(&naive).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}
