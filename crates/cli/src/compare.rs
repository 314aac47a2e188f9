//! `bomsync compare`: report where the table disagrees with the sheet.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use bomsync_recon::config::validate_tolerance;
use bomsync_recon::{reconcile, Divergence, DivergenceReport, Field, FieldCount};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::settings::Settings;
use crate::source::{load_sheet, load_table, table_client};
use crate::CliError;

/// Lists longer than this are cut with an "... and N more" line.
const LIST_LIMIT: usize = 10;
const SAMPLE_LIMIT: usize = 5;

pub struct CompareOptions {
    pub json: bool,
    pub output: Option<PathBuf>,
    pub all_fields: bool,
    pub tolerance: Option<f64>,
}

pub fn cmd_compare(settings: &Settings, opts: CompareOptions) -> Result<(), CliError> {
    let tolerance = opts.tolerance.unwrap_or(settings.config.compare.tolerance);
    validate_tolerance(tolerance).map_err(|e| CliError::usage(e.to_string()))?;

    let fields: Vec<Field> = if opts.all_fields {
        Field::ALL.to_vec()
    } else {
        settings.config.compare.fields.clone()
    };

    let client = table_client(settings)?;
    let sheet = load_sheet(settings)?;
    let table = load_table(settings, &client)?;

    let report = reconcile(&sheet.catalog, &table.catalog, &fields, tolerance);
    let summary = Summary {
        sheet_records: sheet.catalog.len(),
        table_records: table.catalog.len(),
        sheet_rows_skipped: sheet.stats.skipped,
        sheet_duplicates: sheet.stats.duplicates,
        table_rows_skipped: table.stats.skipped,
        defaulted_sheet_cells: sheet.catalog.defaulted_cells(&fields),
    };

    let output = CompareOutput::new(&report, &summary, Utc::now());

    if opts.json || opts.output.is_some() {
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = opts.output {
            std::fs::write(path, &json)
                .map_err(|e| CliError::usage(format!("cannot write {}: {e}", path.display())))?;
            eprintln!("wrote {}", path.display());
        }
        if opts.json {
            println!("{json}");
            return Ok(());
        }
    }

    print!("{}", render_text(&report, &summary));
    Ok(())
}

/// Side totals that live outside the report itself.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub sheet_records: usize,
    pub table_records: usize,
    /// Sheet rows without a part name.
    pub sheet_rows_skipped: usize,
    /// Sheet rows replaced by a later row with the same part name.
    pub sheet_duplicates: usize,
    /// Table rows without an identifier.
    pub table_rows_skipped: usize,
    /// Sheet cells among the compared fields that were blank or unparsable.
    pub defaulted_sheet_cells: usize,
}

// ---------------------------------------------------------------------------
// JSON envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CompareOutput<'a> {
    pub meta: Meta,
    pub counts: Counts,
    pub only_in_sheet: &'a [String],
    pub only_in_table: &'a [String],
    pub frequency: Vec<FieldCount>,
    pub mismatches: &'a BTreeMap<String, Vec<Divergence>>,
}

#[derive(Debug, Serialize)]
pub struct Meta {
    pub version: &'static str,
    pub run_at: DateTime<Utc>,
    pub tolerance: f64,
    pub fields: Vec<Field>,
}

#[derive(Debug, Serialize)]
pub struct Counts {
    pub sheet_records: usize,
    pub table_records: usize,
    pub compared: usize,
    pub mismatched: usize,
    pub only_in_sheet: usize,
    pub only_in_table: usize,
    pub sheet_rows_skipped: usize,
    pub sheet_duplicates: usize,
    pub table_rows_skipped: usize,
    pub defaulted_sheet_cells: usize,
}

impl<'a> CompareOutput<'a> {
    pub fn new(report: &'a DivergenceReport, summary: &Summary, run_at: DateTime<Utc>) -> Self {
        Self {
            meta: Meta {
                version: env!("CARGO_PKG_VERSION"),
                run_at,
                tolerance: report.tolerance,
                fields: report.fields.clone(),
            },
            counts: Counts {
                sheet_records: summary.sheet_records,
                table_records: summary.table_records,
                compared: report.compared,
                mismatched: report.mismatch_count(),
                only_in_sheet: report.only_in_authoritative.len(),
                only_in_table: report.only_in_target.len(),
                sheet_rows_skipped: summary.sheet_rows_skipped,
                sheet_duplicates: summary.sheet_duplicates,
                table_rows_skipped: summary.table_rows_skipped,
                defaulted_sheet_cells: summary.defaulted_sheet_cells,
            },
            only_in_sheet: &report.only_in_authoritative,
            only_in_table: &report.only_in_target,
            frequency: report.field_frequency(),
            mismatches: &report.mismatches,
        }
    }
}

// ---------------------------------------------------------------------------
// Text report
// ---------------------------------------------------------------------------

pub fn render_text(report: &DivergenceReport, summary: &Summary) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Sheet: {} parts", summary.sheet_records);
    if summary.sheet_rows_skipped > 0 || summary.sheet_duplicates > 0 {
        let _ = writeln!(
            out,
            "  ({} rows without a part name skipped, {} duplicate part names, later row kept)",
            summary.sheet_rows_skipped, summary.sheet_duplicates
        );
    }
    let _ = writeln!(out, "Table: {} parts", summary.table_records);
    if summary.table_rows_skipped > 0 {
        let _ = writeln!(out, "  ({} rows without an identifier skipped)", summary.table_rows_skipped);
    }

    let _ = writeln!(out, "\nMissing in table (in sheet, not in table): {}", report.only_in_authoritative.len());
    write_capped(&mut out, &report.only_in_authoritative);

    let _ = writeln!(out, "\nMissing in sheet (in table, not in sheet): {}", report.only_in_target.len());
    write_capped(&mut out, &report.only_in_target);

    let _ = writeln!(out, "\nParts with mismatches: {} / {}", report.mismatch_count(), report.compared);

    let _ = writeln!(out, "\nMismatch frequency by field:");
    for FieldCount { field, keys } in report.field_frequency() {
        let _ = writeln!(out, "  {field}: {keys} parts differ");
    }

    let _ = writeln!(out, "\nSample mismatches (first {SAMPLE_LIMIT}):");
    for (key, divergences) in report.mismatches.iter().take(SAMPLE_LIMIT) {
        let _ = writeln!(out, "\n  {key}:");
        for d in divergences {
            let _ = writeln!(out, "    {}: Sheet={:.6}  DB={:.6}", d.field, d.authoritative, d.target);
        }
    }

    if summary.defaulted_sheet_cells > 0 {
        let _ = writeln!(
            out,
            "\nnote: {} sheet cells were blank or unparsable and compared as 0",
            summary.defaulted_sheet_cells
        );
    }

    out
}

fn write_capped(out: &mut String, keys: &[String]) {
    for key in keys.iter().take(LIST_LIMIT) {
        let _ = writeln!(out, "  {key}");
    }
    if keys.len() > LIST_LIMIT {
        let _ = writeln!(out, "  ... and {} more", keys.len() - LIST_LIMIT);
    }
}
