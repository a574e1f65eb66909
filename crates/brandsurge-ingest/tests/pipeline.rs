//! End-to-end ingestion tests over fixture files in a temp directory.

use std::path::PathBuf;

use brandsurge_core::{columns, SourceDescriptor, SourceFormat};
use brandsurge_ingest::{load_all, load_all_concurrent, prepared, SourceStatus};
use tempfile::TempDir;

const X_CSV: &str = "Date,Sentiment,Source,Engagement,Reach\n\
2024-10-01,positive,Twitter,10,100\n\
2024-10-02,negative,Reddit,20,200\n";

const Y_VENDOR: &str = r#"{
  "documents": [
    {
      "published_date": "2024-10-03T09:00:00Z",
      "enrichments": { "sentiment": "positive" },
      "metrics": { "engagement": { "total": 30 } },
      "source": { "name": "News Daily", "type": "online news", "metrics": { "reach": 300 } },
      "location": { "country_code": "us" }
    },
    { "metrics": "broken" }
  ]
}"#;

const Z_JSON: &str = r#"{"brand": "Z", "Date": "2024-10-04", "Sentiment": "neutral",
  "Engagement": 5, "author": {"name": "Sam"}}"#;

struct Fixture {
    _dir: TempDir,
    sources: Vec<SourceDescriptor>,
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

fn three_sources() -> Fixture {
    let dir = TempDir::new().expect("tempdir");
    let sources = vec![
        SourceDescriptor::new(write(&dir, "X - mentions.csv", X_CSV), SourceFormat::Tabular, None),
        SourceDescriptor::new(
            write(&dir, "vendor.json", Y_VENDOR),
            SourceFormat::NestedVendor,
            Some("Y"),
        ),
        SourceDescriptor::new(
            write(&dir, "single.json", Z_JSON),
            SourceFormat::FlatHierarchical,
            None,
        ),
    ];
    Fixture { _dir: dir, sources }
}

fn brand_column(table: &brandsurge_core::Table) -> Vec<String> {
    table
        .rows()
        .iter()
        .filter_map(|r| r.get(columns::BRAND).label())
        .collect()
}

#[test]
fn three_sources_aggregate_to_four_rows() {
    let fixture = three_sources();
    let outcome = load_all(&fixture.sources);

    assert_eq!(outcome.table.len(), 4);
    assert_eq!(brand_column(&outcome.table), vec!["X", "X", "Y", "Z"]);
    assert_eq!(
        outcome.table.slice().distinct_labels(columns::BRAND),
        vec!["X", "Y", "Z"]
    );
    assert_eq!(
        outcome.reports[1].status,
        SourceStatus::Loaded {
            rows: 1,
            skipped_records: 1
        }
    );
    // Columns are the union across sources.
    assert!(outcome.table.has_column("author.name"));
    assert!(outcome.table.has_column("Media Mention"));
    assert!(outcome.table.has_column(columns::REACH));
}

#[test]
fn prepared_table_has_typed_columns() {
    let fixture = three_sources();
    let table = prepared(load_all(&fixture.sources).table);

    for row in table.rows() {
        let score = row.number(columns::SENTIMENT_SCORE).expect("score present");
        assert!([-1.0, 0.0, 1.0].contains(&score));
        for column in columns::NUMERIC {
            if table.has_column(column) {
                assert!(row.number(column).is_some_and(|n| n >= 0.0), "{column}");
            }
        }
        assert!(row.timestamp(columns::DATE).is_some());
    }
    assert_eq!(table.rows()[2].text(columns::COUNTRY), Some("US"));
    assert_eq!(table.rows()[0].text(columns::COUNTRY), Some("Unknown"));
}

#[test]
fn missing_and_broken_sources_are_skipped() {
    let fixture = three_sources();
    let dir = TempDir::new().expect("tempdir");
    let mut sources = fixture.sources.clone();
    sources.insert(
        0,
        SourceDescriptor::new(dir.path().join("gone.csv"), SourceFormat::Tabular, None),
    );
    sources.push(SourceDescriptor::new(
        write(&dir, "bad.json", r#"{"results": []}"#),
        SourceFormat::NestedVendor,
        None,
    ));

    let outcome = load_all(&sources);
    assert_eq!(outcome.table.len(), 4);
    assert_eq!(outcome.skipped_sources(), 2);
    assert!(matches!(
        outcome.reports[0].status,
        SourceStatus::Skipped { .. }
    ));
}

#[test]
fn configured_brand_overrides_in_row_brand() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(
        &dir,
        "rows.csv",
        "Brand,Engagement\nSomeoneElse,1\nAnother,2\n",
    );
    let outcome = load_all(&[SourceDescriptor::new(
        path,
        SourceFormat::Tabular,
        Some("Acme"),
    )]);
    assert_eq!(brand_column(&outcome.table), vec!["Acme", "Acme"]);
}

#[tokio::test]
async fn concurrent_load_preserves_source_order() {
    let fixture = three_sources();
    let sequential = load_all(&fixture.sources);
    let concurrent = load_all_concurrent(&fixture.sources, 3).await;

    assert_eq!(concurrent.table, sequential.table);
    assert_eq!(concurrent.reports, sequential.reports);
}
