//! Property-based tests for date cell parsing.

use chrono::{Datelike, Days, NaiveDate};
use proptest::prelude::*;

use super::date::{SERIAL_EPOCH, parse_date};

fn date() -> impl Strategy<Value = NaiveDate> {
    (1970i32..2068, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or(SERIAL_EPOCH))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// ISO dates always round-trip.
    #[test]
    fn prop_iso_dates_parse(d in date()) {
        prop_assert_eq!(parse_date(&d.format("%Y-%m-%d").to_string()).unwrap(), d);
    }

    /// Day-first padded dates round-trip whenever the day is a valid day-first read.
    #[test]
    fn prop_day_first_dates_parse(d in date()) {
        let raw = format!("{:02}/{:02}/{}", d.day(), d.month(), d.year());
        prop_assert_eq!(parse_date(&raw).unwrap(), d);
    }

    /// Two-digit years land in 1969-2068.
    #[test]
    fn prop_two_digit_years_pivot(d in date()) {
        let raw = format!("{:02}-{:02}-{:02}", d.day(), d.month(), d.year() % 100);
        let parsed = parse_date(&raw).unwrap();
        prop_assert!((1969..=2068).contains(&parsed.year()));
        prop_assert_eq!(parsed, d);
    }

    /// Non-negative integers are serial day counts.
    #[test]
    fn prop_serial_numbers_count_days(n in 0u64..100_000) {
        let expected = SERIAL_EPOCH.checked_add_days(Days::new(n)).unwrap();
        prop_assert_eq!(parse_date(&n.to_string()).unwrap(), expected);
    }
}
