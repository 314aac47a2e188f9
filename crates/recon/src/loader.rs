//! Build catalogs from the sheet export and from the target table's rows.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ReconError;
use crate::fields::Field;
use crate::mapping::SheetMapping;
use crate::model::{Catalog, LoadStats, Record};
use crate::normalize::{normalize_cell, FieldKind, Normalized};

/// One sheet row: exact header text → raw cell.
pub type SheetRow = HashMap<String, String>;

/// One target table row as returned by the store.
pub type TableRow = Map<String, Value>;

/// Split a CSV export into header-keyed rows.
///
/// Headers are kept byte-for-byte. Short rows are accepted; their missing
/// trailing cells are simply absent from the row.
pub fn parse_sheet_csv(text: &str) -> Result<Vec<SheetRow>, ReconError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = SheetRow::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            if let Some(cell) = record.get(i) {
                row.insert(header.clone(), cell.to_string());
            }
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Build the authoritative catalog from sheet rows.
///
/// Rows with a blank or missing key are skipped. A repeated key replaces the
/// earlier record entirely.
pub fn catalog_from_sheet_rows(rows: &[SheetRow], mapping: &SheetMapping) -> (Catalog, LoadStats) {
    let mut catalog = Catalog::new();
    let mut stats = LoadStats::default();

    for (line, row) in rows.iter().enumerate() {
        stats.rows_seen += 1;

        let key = row.get(&mapping.key_column).map(|k| k.trim()).unwrap_or("");
        if key.is_empty() {
            debug!(row = line + 1, "skipping sheet row without a part name");
            stats.skipped += 1;
            continue;
        }

        let mut record = Record::new();
        for binding in &mapping.columns {
            let raw = row.get(&binding.header).map(String::as_str);
            record.set(binding.field, normalize_cell(raw, binding.kind));
        }

        if catalog.insert(key.to_string(), record).is_some() {
            debug!(key, row = line + 1, "duplicate part name; later row wins");
            stats.duplicates += 1;
        }
    }

    (catalog, stats)
}

/// Build the target catalog from table rows keyed by `key_field`.
///
/// Keys are taken verbatim; only missing, null or blank keys are skipped.
/// Numbers are taken as-is, numeric strings are parsed, and `null`, absent
/// or non-numeric values become defaulted zeros.
pub fn catalog_from_table_rows(rows: &[TableRow], key_field: &str) -> (Catalog, LoadStats) {
    let mut catalog = Catalog::new();
    let mut stats = LoadStats::default();

    for (line, row) in rows.iter().enumerate() {
        stats.rows_seen += 1;

        let Some(key) = row_key(row.get(key_field)) else {
            debug!(row = line + 1, key_field, "skipping table row without an identifier");
            stats.skipped += 1;
            continue;
        };

        let mut record = Record::new();
        for field in Field::ALL {
            record.set(field, coerce_value(row.get(field.name())));
        }

        if catalog.insert(key.clone(), record).is_some() {
            debug!(key = %key, "duplicate identifier in table; later row wins");
            stats.duplicates += 1;
        }
    }

    (catalog, stats)
}

/// The identifier exactly as stored. Padding is kept so a padded key shows
/// up as one-sided instead of silently matching the sheet.
fn row_key(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coerce_value(value: Option<&Value>) -> Normalized {
    match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .map(Normalized::parsed)
            .unwrap_or(Normalized::DEFAULTED),
        Some(Value::String(s)) => normalize_cell(Some(s), FieldKind::PlainNumber),
        _ => Normalized::DEFAULTED,
    }
}
