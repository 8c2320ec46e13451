use chrono::prelude::*;
use chrono_tz::Tz;

/// Calendar components of an instant in a given timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalComponents {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

// Timestamps outside of chrono's representable range clamp to the epoch
fn to_utc(ts_millis: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ts_millis).unwrap_or_default()
}

fn to_local(ts_millis: i64, timezone: &Tz) -> DateTime<Tz> {
    to_utc(ts_millis).with_timezone(timezone)
}

pub fn local_components(ts_millis: i64, timezone: &Tz) -> LocalComponents {
    let local = to_local(ts_millis, timezone);
    LocalComponents {
        year: local.year(),
        month: local.month(),
        day: local.day(),
        hour: local.hour(),
        minute: local.minute(),
    }
}

/// The calendar date of an instant in the clinic timezone. All date-only
/// comparisons go through this, never through raw UTC subtraction: an
/// appointment late in the UTC day may already be "tomorrow" locally.
pub fn local_date(ts_millis: i64, timezone: &Tz) -> NaiveDate {
    to_local(ts_millis, timezone).date_naive()
}

/// Whether the instant falls within the clinic's no-contact window.
/// `quiet_start > quiet_end` wraps across midnight (e.g. 21:00-08:00),
/// `quiet_start == quiet_end` disables quiet hours entirely.
pub fn is_within_quiet_hours(
    ts_millis: i64,
    timezone: &Tz,
    quiet_start: NaiveTime,
    quiet_end: NaiveTime,
) -> bool {
    if quiet_start == quiet_end {
        return false;
    }
    let local_time = to_local(ts_millis, timezone).time();
    if quiet_start < quiet_end {
        local_time >= quiet_start && local_time < quiet_end
    } else {
        local_time >= quiet_start || local_time < quiet_end
    }
}

/// This year's occurrence of the patient's birth month/day, relative to
/// `today`. A Feb 29 birth date only yields an occasion in leap years.
pub fn birthday_occasion(birth_date: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(today.year(), birth_date.month(), birth_date.day())
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono_tz::America::New_York;
    use chrono_tz::UTC;

    fn ts(datetime: &str) -> i64 {
        datetime
            .parse::<DateTime<Utc>>()
            .expect("Valid rfc3339 datetime")
            .timestamp_millis()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).expect("Valid time")
    }

    #[test]
    fn local_date_differs_from_utc_date_near_midnight() {
        // 03:30 UTC on June 2nd is still June 1st in New York (UTC-4 in DST)
        let instant = ts("2024-06-02T03:30:00Z");
        assert_eq!(
            local_date(instant, &UTC),
            NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
        );
        assert_eq!(
            local_date(instant, &New_York),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
    }

    #[test]
    fn local_components_handle_dst_transition() {
        // DST started 2024-03-10 02:00 in New York: offset moves -5 -> -4
        let before = local_components(ts("2024-03-10T06:30:00Z"), &New_York);
        assert_eq!((before.hour, before.minute), (1, 30));

        let after = local_components(ts("2024-03-10T07:30:00Z"), &New_York);
        assert_eq!((after.hour, after.minute), (3, 30));
        assert_eq!(after.day, 10);
    }

    #[test]
    fn quiet_hours_wrap_across_midnight() {
        let start = time(21, 0);
        let end = time(8, 0);

        // 21:30 local in New York (DST, UTC-4)
        assert!(is_within_quiet_hours(
            ts("2024-06-02T01:30:00Z"),
            &New_York,
            start,
            end
        ));
        // 03:00 local
        assert!(is_within_quiet_hours(
            ts("2024-06-02T07:00:00Z"),
            &New_York,
            start,
            end
        ));
        // 15:00 local
        assert!(!is_within_quiet_hours(
            ts("2024-06-02T19:00:00Z"),
            &New_York,
            start,
            end
        ));
        // Boundaries: start is inclusive, end is exclusive
        assert!(is_within_quiet_hours(
            ts("2024-06-02T01:00:00Z"),
            &New_York,
            start,
            end
        ));
        assert!(!is_within_quiet_hours(
            ts("2024-06-02T12:00:00Z"),
            &New_York,
            start,
            end
        ));
    }

    #[test]
    fn quiet_hours_without_wrap() {
        let start = time(12, 0);
        let end = time(13, 0);
        assert!(is_within_quiet_hours(
            ts("2024-06-02T12:30:00Z"),
            &UTC,
            start,
            end
        ));
        assert!(!is_within_quiet_hours(
            ts("2024-06-02T13:30:00Z"),
            &UTC,
            start,
            end
        ));
    }

    #[test]
    fn equal_start_and_end_disables_quiet_hours() {
        let noon = time(12, 0);
        assert!(!is_within_quiet_hours(
            ts("2024-06-02T12:00:00Z"),
            &UTC,
            noon,
            noon
        ));
    }

    #[test]
    fn birthday_occasion_advances_with_year() {
        let birth = NaiveDate::from_ymd_opt(1990, 3, 15).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(
            birthday_occasion(birth, today),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );

        let next_year = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(
            birthday_occasion(birth, next_year),
            NaiveDate::from_ymd_opt(2025, 3, 15)
        );
    }

    #[test]
    fn feb_29_birthdays_only_occur_in_leap_years() {
        let birth = NaiveDate::from_ymd_opt(1992, 2, 29).unwrap();

        let leap = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(birthday_occasion(birth, leap), NaiveDate::from_ymd_opt(2024, 2, 29));

        let non_leap = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert_eq!(birthday_occasion(birth, non_leap), None);
    }
}
