#[cfg(test)]
mod tests {
    use crate::slots::{day_bounds, generate_slots, local_clock, local_date};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use chrono_tz::Tz;

    fn zone() -> Tz {
        Tz::Asia__Kolkata
    }

    fn grain() -> Duration {
        Duration::minutes(30)
    }

    // An instant expressed as Kolkata wall-clock time.
    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        zone()
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_ninety_minute_range_partitions_into_three_slots() {
        let now = at(2026, 9, 1, 0, 0);
        let slots = generate_slots("2026-09-01", "09:00", "10:30", now, zone(), grain());

        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].start, at(2026, 9, 1, 9, 0));
        assert_eq!(slots[0].end, at(2026, 9, 1, 9, 30));
        // Contiguous and covering [start, end) exactly
        assert_eq!(slots[1].start, slots[0].end);
        assert_eq!(slots[2].start, slots[1].end);
        assert_eq!(slots[2].end, at(2026, 9, 1, 10, 30));
    }

    #[test]
    fn test_trailing_partial_interval_is_discarded() {
        let now = at(2026, 9, 1, 0, 0);
        let slots = generate_slots("2026-09-01", "09:00", "09:45", now, zone(), grain());

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start, at(2026, 9, 1, 9, 0));
        assert_eq!(slots[0].end, at(2026, 9, 1, 9, 30));
    }

    #[test]
    fn test_slots_starting_at_or_before_reference_now_are_filtered() {
        // 09:00 is in the past, 09:30 starts exactly at the reference
        // instant; only 10:00 survives.
        let now = at(2026, 9, 1, 9, 30);
        let slots = generate_slots("2026-09-01", "09:00", "10:30", now, zone(), grain());

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start, at(2026, 9, 1, 10, 0));
    }

    #[test]
    fn test_empty_when_start_is_not_before_end() {
        let now = at(2026, 9, 1, 0, 0);
        assert!(generate_slots("2026-09-01", "10:00", "10:00", now, zone(), grain()).is_empty());
        assert!(generate_slots("2026-09-01", "11:00", "10:00", now, zone(), grain()).is_empty());
    }

    #[test]
    fn test_empty_on_unparseable_input() {
        let now = at(2026, 9, 1, 0, 0);
        assert!(generate_slots("not-a-date", "09:00", "10:00", now, zone(), grain()).is_empty());
        assert!(generate_slots("2026-09-01", "9am", "10:00", now, zone(), grain()).is_empty());
        assert!(generate_slots("2026-09-01", "09:00", "", now, zone(), grain()).is_empty());
    }

    #[test]
    fn test_empty_when_local_time_does_not_exist() {
        // Europe/Zurich skips 02:00-03:00 on 2025-03-30; 02:30 never occurs.
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let slots = generate_slots(
            "2025-03-30",
            "02:30",
            "03:30",
            now,
            Tz::Europe__Zurich,
            grain(),
        );
        assert!(slots.is_empty());
    }

    #[test]
    fn test_clock_with_seconds_is_accepted() {
        let now = at(2026, 9, 1, 0, 0);
        let slots = generate_slots("2026-09-01", "09:00:00", "10:00:00", now, zone(), grain());
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn test_window_converts_to_millisecond_bounds() {
        let now = at(2026, 9, 1, 0, 0);
        let slots = generate_slots("2026-09-01", "09:00", "09:30", now, zone(), grain());
        let new_slot = slots[0].to_new_slot();

        assert_eq!(new_slot.start_ms, at(2026, 9, 1, 9, 0).timestamp_millis());
        assert_eq!(new_slot.end_ms, at(2026, 9, 1, 9, 30).timestamp_millis());
    }

    #[test]
    fn test_day_bounds_cover_the_local_day() {
        let (from, to) = day_bounds("2026-09-01", zone()).unwrap();
        assert_eq!(from, at(2026, 9, 1, 0, 0));
        assert_eq!(to, at(2026, 9, 2, 0, 0));

        assert!(day_bounds("2026-13-01", zone()).is_none());
    }

    #[test]
    fn test_local_rendering_uses_the_reference_zone() {
        // 03:30 UTC is 09:00 in Kolkata.
        let instant = Utc.with_ymd_and_hms(2026, 9, 1, 3, 30, 0).unwrap();
        assert_eq!(local_date(instant, zone()), "2026-09-01");
        assert_eq!(local_clock(instant, zone()), "09:00");
    }
}
