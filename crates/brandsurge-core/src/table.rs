//! The unified mention table.
//!
//! Every source is normalized into a [`Table`]: an ordered column set plus a
//! list of [`Record`]s. A record that lacks one of the table's columns reads
//! as [`Cell::Null`] for it, so concatenating sources with different column
//! sets never fails.
//!
//! Read-only views are taken through [`Slice`], which borrows the table and
//! exposes column-aware accessors that return `None` when the table does not
//! carry a column at all.

use std::collections::{BTreeMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Canonical column names of the unified schema.
pub mod columns {
    pub const DATE: &str = "Date";
    pub const BRAND: &str = "brand";
    /// Alternate capitalization some exports use for the brand column.
    pub const BRAND_ALT: &str = "Brand";
    pub const SENTIMENT: &str = "Sentiment";
    pub const SENTIMENT_SCORE: &str = "sentiment_score";
    pub const SOURCE: &str = "Source";
    pub const ENGAGEMENT: &str = "Engagement";
    pub const VIEWS: &str = "Views";
    pub const ESTIMATED_VIEWS: &str = "Estimated Views";
    pub const REACH: &str = "Reach";
    pub const AVE: &str = "AVE";
    pub const COUNTRY: &str = "Country";
    pub const STATE: &str = "State";
    pub const CITY: &str = "City";
    pub const KEY_PHRASES: &str = "Key Phrases";
    pub const KEYWORDS: &str = "Keywords";

    /// Columns coerced to non-negative numbers during preparation.
    pub const NUMERIC: [&str; 5] = [REACH, ENGAGEMENT, VIEWS, ESTIMATED_VIEWS, AVE];

    /// Column set of the table returned when no source yields any rows.
    pub const MINIMAL: [&str; 5] = [DATE, BRAND, SENTIMENT, SOURCE, ENGAGEMENT];
}

/// A single value in the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Cell {
    /// Converts a JSON value into a cell. Arrays and objects are kept as
    /// their compact JSON text.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Cell::Null,
            serde_json::Value::Bool(b) => Cell::Bool(*b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Cell::Null, Cell::Number),
            serde_json::Value::String(s) => Cell::Text(s.clone()),
            other => Cell::Text(other.to_string()),
        }
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// `true` for nulls and whitespace-only text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric reading of the cell: numbers as-is, text parsed after
    /// trimming, booleans as 1/0. Non-finite values read as `None`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Bool(b) => f64::from(u8::from(*b)),
            Cell::Null | Cell::Timestamp(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Display label used for grouping. Blank cells have no label.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Number(n) => Some(n.to_string()),
            Cell::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
            Cell::Timestamp(ts) => Some(ts.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

/// One row of the unified table, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, Cell>);

static NULL: Cell = Cell::Null;

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cell for `column`; absent columns read as [`Cell::Null`].
    #[must_use]
    pub fn get(&self, column: &str) -> &Cell {
        self.0.get(column).unwrap_or(&NULL)
    }

    pub fn insert(&mut self, column: impl Into<String>, cell: Cell) {
        self.0.insert(column.into(), cell);
    }

    pub fn remove(&mut self, column: &str) -> Option<Cell> {
        self.0.remove(column)
    }

    #[must_use]
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).as_text()
    }

    #[must_use]
    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).as_f64()
    }

    #[must_use]
    pub fn timestamp(&self, column: &str) -> Option<NaiveDateTime> {
        self.get(column).as_timestamp()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn rename(&mut self, from: &str, to: &str) {
        if let Some(cell) = self.0.remove(from) {
            self.0.insert(to.to_string(), cell);
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Cell)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Cell)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// An ordered column set plus its rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Table {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty table that already declares `columns`.
    #[must_use]
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for column in columns {
            table.add_column(column);
        }
        table
    }

    /// Builds a table whose column set is the union of the records' keys.
    #[must_use]
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut table = Self::new();
        for record in records {
            table.push(record);
        }
        table
    }

    /// Concatenates tables in order. The result's columns are the union of
    /// all inputs in first-seen order; row order is preserved.
    #[must_use]
    pub fn concat(tables: Vec<Table>) -> Self {
        let mut combined = Self::new();
        for table in tables {
            for column in table.columns {
                combined.add_column(column);
            }
            combined.rows.extend(table.rows);
        }
        combined
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    #[must_use]
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn add_column(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.has_column(&name) {
            self.columns.push(name);
        }
    }

    /// Appends a row, extending the column set with any new keys.
    pub fn push(&mut self, record: Record) {
        let missing: Vec<String> = record
            .keys()
            .filter(|k| !self.has_column(k))
            .map(ToString::to_string)
            .collect();
        self.columns.extend(missing);
        self.rows.push(record);
    }

    /// Sets `name` on every row to `f(row)`, adding the column if needed.
    pub fn set_column<F>(&mut self, name: &str, mut f: F)
    where
        F: FnMut(&Record) -> Cell,
    {
        self.add_column(name);
        for row in &mut self.rows {
            let cell = f(row);
            row.insert(name, cell);
        }
    }

    /// Rewrites every cell of an existing column. No-op if the column is absent.
    pub fn map_column<F>(&mut self, name: &str, mut f: F)
    where
        F: FnMut(&Cell) -> Cell,
    {
        if !self.has_column(name) {
            return;
        }
        for row in &mut self.rows {
            let cell = f(row.get(name));
            row.insert(name, cell);
        }
    }

    /// Renames a column in place. If `to` already exists it is replaced.
    pub fn rename_column(&mut self, from: &str, to: &str) {
        if !self.has_column(from) {
            return;
        }
        self.drop_column(to);
        for column in &mut self.columns {
            if column == from {
                *column = to.to_string();
            }
        }
        for row in &mut self.rows {
            row.rename(from, to);
        }
    }

    pub fn drop_column(&mut self, name: &str) {
        self.columns.retain(|c| c != name);
        for row in &mut self.rows {
            row.remove(name);
        }
    }

    /// Trims surrounding whitespace from every column name.
    pub fn trim_column_names(&mut self) {
        let untrimmed: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.trim() != c.as_str())
            .cloned()
            .collect();
        for column in untrimmed {
            let trimmed = column.trim().to_string();
            self.rename_column(&column, &trimmed);
        }
    }

    /// A view over every row.
    #[must_use]
    pub fn slice(&self) -> Slice<'_> {
        Slice {
            table: self,
            rows: self.rows.iter().collect(),
        }
    }
}

/// A borrowed, filtered view of a [`Table`].
#[derive(Debug, Clone)]
pub struct Slice<'a> {
    table: &'a Table,
    rows: Vec<&'a Record>,
}

impl<'a> Slice<'a> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> &[&'a Record] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.rows.iter().copied()
    }

    #[must_use]
    pub fn table(&self) -> &'a Table {
        self.table
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.table.has_column(name)
    }

    #[must_use]
    pub fn filter<P>(&self, mut predicate: P) -> Slice<'a>
    where
        P: FnMut(&Record) -> bool,
    {
        Slice {
            table: self.table,
            rows: self.rows.iter().copied().filter(|r| predicate(r)).collect(),
        }
    }

    /// Rows whose `brand` label equals `brand`.
    #[must_use]
    pub fn for_brand(&self, brand: &str) -> Slice<'a> {
        self.filter(|r| r.get(columns::BRAND).label().as_deref() == Some(brand))
    }

    /// Rows dated within `[start, end]` by calendar day. Rows without a
    /// parsed date are excluded.
    #[must_use]
    pub fn within(&self, start: NaiveDate, end: NaiveDate) -> Slice<'a> {
        self.filter(|r| {
            r.timestamp(columns::DATE)
                .is_some_and(|ts| (start..=end).contains(&ts.date()))
        })
    }

    /// Numeric values of `column`, or `None` when the table lacks it.
    /// Unparseable and null cells read as `0.0`.
    #[must_use]
    pub fn numbers(&self, column: &str) -> Option<Vec<f64>> {
        if !self.has_column(column) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .map(|r| r.number(column).unwrap_or(0.0))
                .collect(),
        )
    }

    #[must_use]
    pub fn sum(&self, column: &str) -> Option<f64> {
        self.numbers(column).map(|values| values.iter().sum())
    }

    /// Mean of `column`; `None` when the column is absent or the slice is empty.
    #[must_use]
    pub fn mean(&self, column: &str) -> Option<f64> {
        let values = self.numbers(column)?;
        if values.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let denom = values.len() as f64;
        Some(values.iter().sum::<f64>() / denom)
    }

    /// Maximum of `column`; `None` when the column is absent or the slice is empty.
    #[must_use]
    pub fn max(&self, column: &str) -> Option<f64> {
        self.numbers(column)?.into_iter().reduce(f64::max)
    }

    /// Latest parsed timestamp in `column`.
    #[must_use]
    pub fn max_timestamp(&self, column: &str) -> Option<NaiveDateTime> {
        self.rows.iter().filter_map(|r| r.timestamp(column)).max()
    }

    /// Distinct labels of `column` in first-seen order.
    #[must_use]
    pub fn distinct_labels(&self, column: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter_map(|r| r.get(column).label())
            .filter(|label| seen.insert(label.clone()))
            .collect()
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
