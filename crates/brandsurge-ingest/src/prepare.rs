//! Schema preparation: the single pass that turns an aggregated table into
//! the typed unified schema the metrics read.

use brandsurge_core::{columns, Cell, Table};

use crate::dates::parse_timestamp;

/// Fill value for blank categorical columns.
const UNKNOWN: &str = "Unknown";

/// Score for a sentiment label, case-insensitive. Anything other than
/// positive or negative scores 0.
#[must_use]
pub fn sentiment_score(label: &Cell) -> i8 {
    match label.as_text().map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("positive") => 1,
        Some("negative") => -1,
        _ => 0,
    }
}

/// Prepares an aggregated table in place.
///
/// - `Date` becomes a timestamp, or null when unparseable.
/// - `sentiment_score` is derived from `Sentiment` (0 when the column is absent).
/// - [`columns::NUMERIC`] are coerced to non-negative finite numbers; anything else is 0.
/// - Blank `Source` and `Country` become `"Unknown"`.
///
/// Idempotent. An empty table is returned untouched so no columns appear
/// that the sources did not provide.
pub fn prepare(table: &mut Table) {
    if table.is_empty() {
        return;
    }

    table.map_column(columns::DATE, |cell| {
        parse_timestamp(cell).map_or(Cell::Null, Cell::Timestamp)
    });

    let has_sentiment = table.has_column(columns::SENTIMENT);
    table.set_column(columns::SENTIMENT_SCORE, |row| {
        let score = if has_sentiment {
            sentiment_score(row.get(columns::SENTIMENT))
        } else {
            0
        };
        Cell::Number(f64::from(score))
    });

    for column in columns::NUMERIC {
        table.map_column(column, |cell| {
            Cell::Number(cell.as_f64().filter(|n| *n > 0.0).unwrap_or(0.0))
        });
    }

    for column in [columns::SOURCE, columns::COUNTRY] {
        table.map_column(column, |cell| {
            if cell.is_blank() {
                Cell::text(UNKNOWN)
            } else {
                cell.clone()
            }
        });
    }
}

/// Owned convenience wrapper around [`prepare`].
#[must_use]
pub fn prepared(mut table: Table) -> Table {
    prepare(&mut table);
    table
}

#[cfg(test)]
mod tests {
    use brandsurge_core::Record;
    use chrono::NaiveDate;

    use super::*;

    fn record(pairs: &[(&str, Cell)]) -> Record {
        pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    #[test]
    fn sentiment_mapping_is_case_insensitive() {
        assert_eq!(sentiment_score(&Cell::text("Positive")), 1);
        assert_eq!(sentiment_score(&Cell::text(" NEGATIVE ")), -1);
        assert_eq!(sentiment_score(&Cell::text("neutral")), 0);
        assert_eq!(sentiment_score(&Cell::text("unknown")), 0);
        assert_eq!(sentiment_score(&Cell::text("mixed")), 0);
        assert_eq!(sentiment_score(&Cell::Null), 0);
    }

    #[test]
    fn prepares_dates_numbers_and_defaults() {
        let table = prepared(Table::from_records(vec![
            record(&[
                (columns::DATE, Cell::text("2024-10-16")),
                (columns::SENTIMENT, Cell::text("Positive")),
                (columns::ENGAGEMENT, Cell::text("12")),
                (columns::REACH, Cell::text("lots")),
            ]),
            record(&[
                (columns::DATE, Cell::text("not a date")),
                (columns::SENTIMENT, Cell::text("negative")),
                (columns::ENGAGEMENT, Cell::Number(-4.0)),
                (columns::SOURCE, Cell::text("Twitter")),
            ]),
        ]));

        let first = &table.rows()[0];
        assert_eq!(
            first.timestamp(columns::DATE),
            NaiveDate::from_ymd_opt(2024, 10, 16).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert_eq!(first.number(columns::SENTIMENT_SCORE), Some(1.0));
        assert_eq!(first.number(columns::ENGAGEMENT), Some(12.0));
        assert_eq!(first.number(columns::REACH), Some(0.0));
        assert_eq!(first.text(columns::SOURCE), Some("Unknown"));

        let second = &table.rows()[1];
        assert!(second.get(columns::DATE).is_null());
        assert_eq!(second.number(columns::SENTIMENT_SCORE), Some(-1.0));
        assert_eq!(second.number(columns::ENGAGEMENT), Some(0.0));
        assert_eq!(second.number(columns::REACH), Some(0.0));
        assert_eq!(second.text(columns::SOURCE), Some("Twitter"));
    }

    #[test]
    fn missing_sentiment_column_scores_zero() {
        let table = prepared(Table::from_records(vec![record(&[(
            columns::ENGAGEMENT,
            Cell::Number(1.0),
        )])]));
        assert_eq!(table.rows()[0].number(columns::SENTIMENT_SCORE), Some(0.0));
        assert!(!table.has_column(columns::COUNTRY));
    }

    #[test]
    fn empty_table_is_returned_unchanged() {
        let table = Table::with_columns(columns::MINIMAL);
        assert_eq!(prepared(table.clone()), table);
    }

    #[test]
    fn prepare_is_idempotent() {
        let once = prepared(Table::from_records(vec![
            record(&[
                (columns::DATE, Cell::text("16-Oct-2024 08:15AM")),
                (columns::SENTIMENT, Cell::text("neutral")),
                (columns::AVE, Cell::text("3.5")),
                (columns::COUNTRY, Cell::text("")),
            ]),
            record(&[(columns::DATE, Cell::Number(1_700_000_000_000.0))]),
        ]));
        let twice = prepared(once.clone());
        assert_eq!(once, twice);
    }
}
