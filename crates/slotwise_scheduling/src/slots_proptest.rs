#[cfg(test)]
mod tests {
    use crate::slots::generate_slots;
    use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
    use chrono_tz::Tz;
    use proptest::prelude::*;

    fn zone() -> Tz {
        Tz::Asia__Kolkata
    }

    fn grain() -> Duration {
        Duration::minutes(30)
    }

    // Build the test date and clocks from offsets so every generated input is
    // a valid declaration that stays inside one calendar day.
    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + Duration::days(offset)
    }

    fn range_start_instant(date: NaiveDate, start: NaiveTime) -> DateTime<Utc> {
        zone()
            .from_local_datetime(&date.and_time(start))
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    proptest! {
        // The output is always a gapless partition of whole grains.
        #[test]
        fn test_windows_are_grain_sized_and_contiguous(
            day_offset in 0..365i64,
            start_hour in 0..16u32,
            start_minute in prop::sample::select(vec![0u32, 15, 30, 45]),
            slot_count in 1..12usize,
            trailing in 0..30i64,
        ) {
            let date = day(day_offset);
            let start = NaiveTime::from_hms_opt(start_hour, start_minute, 0).unwrap();
            let end = start + Duration::minutes(30 * slot_count as i64 + trailing);

            // Reference instant before the day starts, so nothing is filtered.
            let now = range_start_instant(date, start) - Duration::days(1);

            let windows = generate_slots(
                &date.format("%Y-%m-%d").to_string(),
                &start.format("%H:%M").to_string(),
                &end.format("%H:%M").to_string(),
                now,
                zone(),
                grain(),
            );

            // The trailing partial interval never yields an extra window.
            prop_assert_eq!(windows.len(), slot_count);
            prop_assert_eq!(windows[0].start, range_start_instant(date, start));
            for window in &windows {
                prop_assert_eq!(window.end - window.start, grain());
            }
            for pair in windows.windows(2) {
                prop_assert_eq!(pair[1].start, pair[0].end);
            }
        }

        // No window ever starts at or before the reference instant.
        #[test]
        fn test_no_window_starts_at_or_before_reference_now(
            day_offset in 0..60i64,
            start_hour in 0..16u32,
            slot_count in 1..12usize,
            cut in 0..14usize,
        ) {
            let date = day(day_offset);
            let start = NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap();
            let end = start + Duration::minutes(30 * slot_count as i64);

            let range_start = range_start_instant(date, start);
            let now = range_start + grain() * cut as i32;

            let windows = generate_slots(
                &date.format("%Y-%m-%d").to_string(),
                &start.format("%H:%M").to_string(),
                &end.format("%H:%M").to_string(),
                now,
                zone(),
                grain(),
            );

            let expected = (0..slot_count)
                .filter(|i| range_start + grain() * *i as i32 > now)
                .count();
            prop_assert_eq!(windows.len(), expected);
            for window in &windows {
                prop_assert!(window.start > now);
            }
        }

        // Arbitrary garbage must never panic, and whatever does parse still
        // comes back as whole grains.
        #[test]
        fn test_arbitrary_input_never_panics(
            date in "[a-z0-9/:-]{0,12}",
            start in "[0-9:]{0,5}",
            end in "[0-9:]{0,5}",
        ) {
            let windows = generate_slots(&date, &start, &end, Utc::now(), zone(), grain());
            for window in &windows {
                prop_assert_eq!(window.end - window.start, grain());
            }
        }
    }
}
