//! Lenient timestamp parsing for the `Date` column.
//!
//! Sources disagree on date formats: the vendor API emits RFC 3339, CSV
//! exports use `16-Oct-2024 08:15AM`, hand-made JSON uses plain ISO dates.
//! Anything unrecognized parses to `None`, which the preparer stores as
//! [`Cell::Null`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use brandsurge_core::Cell;

const ZONED_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d-%b-%Y %I:%M%p",
    "%d-%b-%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Parses a cell into a UTC-naive timestamp.
///
/// Numbers are read as epoch milliseconds. Already-parsed timestamps pass
/// through unchanged.
#[must_use]
pub fn parse_timestamp(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::Timestamp(ts) => Some(*ts),
        Cell::Text(s) => parse_timestamp_str(s),
        Cell::Number(n) if n.is_finite() => {
            #[allow(clippy::cast_possible_truncation)]
            let millis = n.round() as i64;
            DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
        }
        _ => None,
    }
}

/// Parses a date string in any of the supported formats.
#[must_use]
pub fn parse_timestamp_str(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for fmt in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_utc());
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn parses_rfc3339_and_converts_to_utc() {
        assert_eq!(
            parse_timestamp_str("2024-10-16T10:15:00+02:00"),
            Some(at(2024, 10, 16, 8, 15))
        );
        assert_eq!(
            parse_timestamp_str("2024-10-16T08:15:00Z"),
            Some(at(2024, 10, 16, 8, 15))
        );
    }

    #[test]
    fn parses_offset_without_colon() {
        assert_eq!(
            parse_timestamp_str("2024-10-16T08:15:00.000+0000"),
            Some(at(2024, 10, 16, 8, 15))
        );
    }

    #[test]
    fn parses_vendor_csv_export_format() {
        assert_eq!(
            parse_timestamp_str("16-Oct-2024 08:15AM"),
            Some(at(2024, 10, 16, 8, 15))
        );
        assert_eq!(
            parse_timestamp_str("16-Oct-2024 08:15PM"),
            Some(at(2024, 10, 16, 20, 15))
        );
    }

    #[test]
    fn parses_plain_dates_at_midnight() {
        assert_eq!(parse_timestamp_str("2024-03-05"), Some(at(2024, 3, 5, 0, 0)));
        assert_eq!(parse_timestamp_str("03/05/2024"), Some(at(2024, 3, 5, 0, 0)));
        assert_eq!(parse_timestamp_str("Mar 5, 2024"), Some(at(2024, 3, 5, 0, 0)));
    }

    #[test]
    fn parses_naive_datetime() {
        assert_eq!(
            parse_timestamp_str("2024-03-05 13:45:10"),
            Some(
                NaiveDate::from_ymd_opt(2024, 3, 5)
                    .unwrap()
                    .and_hms_opt(13, 45, 10)
                    .unwrap()
            )
        );
    }

    #[test]
    fn rejects_garbage_and_empty() {
        assert_eq!(parse_timestamp_str("yesterday-ish"), None);
        assert_eq!(parse_timestamp_str("   "), None);
        assert_eq!(parse_timestamp_str("2024-13-45"), None);
    }

    #[test]
    fn numbers_are_epoch_millis() {
        assert_eq!(
            parse_timestamp(&Cell::Number(1_700_000_000_000.0)),
            Some(
                DateTime::from_timestamp(1_700_000_000, 0)
                    .unwrap()
                    .naive_utc()
            )
        );
    }

    #[test]
    fn timestamps_pass_through_and_null_stays_none() {
        let ts = at(2024, 1, 1, 0, 0);
        assert_eq!(parse_timestamp(&Cell::Timestamp(ts)), Some(ts));
        assert_eq!(parse_timestamp(&Cell::Null), None);
        assert_eq!(parse_timestamp(&Cell::Bool(true)), None);
    }
}
