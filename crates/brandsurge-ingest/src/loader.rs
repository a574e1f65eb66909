//! Per-source loading: read one descriptor's file into a [`Table`] and
//! assign its `brand` column.

use std::path::Path;

use brandsurge_core::{columns, Cell, Record, SourceDescriptor, SourceFormat, Table, UNKNOWN_BRAND};
use serde_json::Value;

use crate::error::IngestError;
use crate::vendor::{normalize_documents, SkippedRecord};

/// Key under which vendor exports nest their document array.
const DOCUMENTS_KEY: &str = "documents";

/// Joins nested keys into flattened column names.
const FLATTEN_SEPARATOR: &str = ".";

/// A successfully loaded source.
#[derive(Debug, Default)]
pub struct LoadedSource {
    pub table: Table,
    /// Vendor records dropped during normalization. Always empty for other formats.
    pub skipped_records: Vec<SkippedRecord>,
}

/// Loads one source according to its declared format.
///
/// # Errors
///
/// Returns [`IngestError::NotFound`] when the file does not exist, and the
/// other variants for read failures and unparseable or unsupported content.
pub fn load_source(descriptor: &SourceDescriptor) -> Result<LoadedSource, IngestError> {
    let path = descriptor.location.as_path();
    let text = read_text(path)?;

    let mut loaded = match descriptor.format {
        SourceFormat::Tabular => LoadedSource {
            table: parse_tabular(path, &text)?,
            skipped_records: Vec::new(),
        },
        SourceFormat::FlatHierarchical => LoadedSource {
            table: parse_flat(path, &text)?,
            skipped_records: Vec::new(),
        },
        SourceFormat::NestedVendor => parse_vendor(path, &text)?,
    };

    loaded.table.trim_column_names();
    assign_brand(&mut loaded.table, descriptor);

    tracing::debug!(
        source = %path.display(),
        format = %descriptor.format,
        rows = loaded.table.len(),
        skipped_records = loaded.skipped_records.len(),
        "loaded source"
    );
    Ok(loaded)
}

fn read_text(path: &Path) -> Result<String, IngestError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(IngestError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(IngestError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Parses delimited text with a header row. Empty fields become nulls;
/// short rows leave the trailing columns null. Rows with more fields than
/// the header are skipped with a warning.
///
/// # Errors
///
/// Returns [`IngestError::EmptyTabular`] when there is no header row.
pub(crate) fn parse_tabular(path: &Path, text: &str) -> Result<Table, IngestError> {
    let csv_error = |source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.trim_start_matches('\u{feff}').as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(ToString::to_string)
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(IngestError::EmptyTabular {
            path: path.to_path_buf(),
        });
    }

    let mut table = Table::with_columns(headers.iter().cloned());
    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        if row.len() > headers.len() {
            tracing::warn!(
                source = %path.display(),
                line = row.position().map_or(0, csv::Position::line),
                fields = row.len(),
                expected = headers.len(),
                "skipping row with more fields than the header"
            );
            continue;
        }
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(header, field)| {
                let cell = if field.is_empty() {
                    Cell::Null
                } else {
                    Cell::text(field)
                };
                (header.clone(), cell)
            })
            .collect();
        table.push(record);
    }
    Ok(table)
}

/// Parses a generic JSON document. A uniform record array (or a column map
/// of equal-length arrays) is taken as-is; anything else is flattened with
/// nested keys joined by `.`.
pub(crate) fn parse_flat(path: &Path, text: &str) -> Result<Table, IngestError> {
    let value: Value = serde_json::from_str(text).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(table) = tabular_interpretation(&value) {
        return Ok(table);
    }

    match value {
        object @ Value::Object(_) => Ok(Table::from_records(vec![flatten(&object)])),
        Value::Array(items) => {
            let mut table = Table::new();
            for (index, item) in items.iter().enumerate() {
                if item.is_object() {
                    table.push(flatten(item));
                } else {
                    tracing::warn!(
                        source = %path.display(),
                        index,
                        "skipping non-object element in JSON array"
                    );
                }
            }
            Ok(table)
        }
        other => Err(IngestError::UnsupportedShape {
            path: path.to_path_buf(),
            reason: format!("top-level {} is not an object or array", json_kind(&other)),
        }),
    }
}

/// Direct row-per-object reading. Returns `None` when the document is not a
/// uniform array of flat objects or a map of equal-length column arrays.
fn tabular_interpretation(value: &Value) -> Option<Table> {
    match value {
        Value::Array(items) => {
            let objects = items
                .iter()
                .map(|item| item.as_object().filter(|o| o.values().all(is_flat)))
                .collect::<Option<Vec<_>>>()?;
            let mut table = Table::new();
            for object in objects {
                table.push(
                    object
                        .iter()
                        .map(|(k, v)| (k.clone(), Cell::from_json(v)))
                        .collect(),
                );
            }
            Some(table)
        }
        Value::Object(map) => {
            let arrays = map
                .iter()
                .map(|(k, v)| v.as_array().map(|a| (k, a)))
                .collect::<Option<Vec<_>>>()?;
            let len = arrays.first().map_or(0, |(_, a)| a.len());
            if arrays.iter().any(|(_, a)| a.len() != len || !a.iter().all(is_flat)) {
                return None;
            }
            let mut table = Table::with_columns(arrays.iter().map(|(k, _)| k.as_str()));
            for i in 0..len {
                table.push(
                    arrays
                        .iter()
                        .map(|(k, a)| ((*k).clone(), Cell::from_json(&a[i])))
                        .collect(),
                );
            }
            Some(table)
        }
        _ => None,
    }
}

fn is_flat(value: &Value) -> bool {
    !value.is_object() && !value.is_array()
}

fn flatten(value: &Value) -> Record {
    let mut record = Record::new();
    flatten_into(&mut record, None, value);
    record
}

fn flatten_into(record: &mut Record, prefix: Option<&str>, value: &Value) {
    match (prefix, value) {
        (_, Value::Object(map)) => {
            for (key, child) in map {
                let name = match prefix {
                    Some(p) => format!("{p}{FLATTEN_SEPARATOR}{key}"),
                    None => key.clone(),
                };
                flatten_into(record, Some(&name), child);
            }
        }
        (Some(name), leaf) => record.insert(name, Cell::from_json(leaf)),
        (None, _) => {}
    }
}

fn parse_vendor(path: &Path, text: &str) -> Result<LoadedSource, IngestError> {
    let value: Value = serde_json::from_str(text).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let shape_error = |reason: String| IngestError::UnexpectedVendorShape {
        path: path.to_path_buf(),
        reason,
    };

    let documents = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(DOCUMENTS_KEY) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(shape_error(format!(
                    "`{DOCUMENTS_KEY}` is {}, expected an array",
                    json_kind(&other)
                )))
            }
            None => return Err(shape_error(format!("object has no `{DOCUMENTS_KEY}` array"))),
        },
        other => {
            return Err(shape_error(format!(
                "top-level {} is not an object or array",
                json_kind(&other)
            )))
        }
    };

    let outcome = normalize_documents(documents);
    if !outcome.skipped.is_empty() {
        tracing::warn!(
            source = %path.display(),
            skipped = outcome.skipped.len(),
            "some vendor records were skipped"
        );
    }
    Ok(LoadedSource {
        table: outcome.table,
        skipped_records: outcome.skipped,
    })
}

/// Makes `brand` present and non-blank on every row.
///
/// An alternate `Brand` column is renamed (or merged into an existing
/// `brand`). A configured brand then overrides every row; otherwise blank
/// cells fall back to the filename guess and finally [`UNKNOWN_BRAND`].
pub(crate) fn assign_brand(table: &mut Table, descriptor: &SourceDescriptor) {
    if table.has_column(columns::BRAND_ALT) {
        if table.has_column(columns::BRAND) {
            table.set_column(columns::BRAND, |row| {
                let own = row.get(columns::BRAND);
                if own.is_blank() {
                    row.get(columns::BRAND_ALT).clone()
                } else {
                    own.clone()
                }
            });
            table.drop_column(columns::BRAND_ALT);
        } else {
            table.rename_column(columns::BRAND_ALT, columns::BRAND);
        }
    }

    if let Some(brand) = descriptor.configured_brand() {
        table.set_column(columns::BRAND, |_| Cell::text(brand));
        return;
    }

    let fallback = descriptor
        .filename_brand()
        .unwrap_or_else(|| UNKNOWN_BRAND.to_string());
    table.set_column(columns::BRAND, |row| {
        let own = row.get(columns::BRAND);
        if own.is_blank() {
            Cell::text(fallback.as_str())
        } else {
            own.clone()
        }
    });
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
