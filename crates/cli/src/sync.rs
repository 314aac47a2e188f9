//! `bomsync sync`: push sheet values onto the table, one PATCH per part.

use std::fmt::Write as _;

use bomsync_recon::sync::{apply, DryRunSink};
use bomsync_recon::{RecordPatch, RecordSink, SyncOutcome};
use bomsync_remote::{RemoteError, TableClient};

use crate::settings::Settings;
use crate::source::{load_sheet, table_client};
use crate::CliError;

/// Sends each patch to the target table.
pub struct TableSink<'a> {
    client: &'a TableClient,
    table: &'a str,
    key_column: &'a str,
}

impl<'a> TableSink<'a> {
    pub fn new(client: &'a TableClient, table: &'a str, key_column: &'a str) -> Self {
        Self { client, table, key_column }
    }
}

impl RecordSink for TableSink<'_> {
    type Error = RemoteError;

    fn update(&mut self, key: &str, patch: &RecordPatch) -> Result<(), RemoteError> {
        self.client.update_row(self.table, self.key_column, key, patch)
    }
}

/// Per-record failures never change the exit code; only fetch and setup
/// problems do.
pub fn cmd_sync(settings: &Settings, dry_run: bool) -> Result<(), CliError> {
    let fields = &settings.config.sync.fields;

    if dry_run {
        let sheet = load_sheet(settings)?;
        println!("Sheet: {} parts", sheet.catalog.len());

        let mut sink = DryRunSink::default();
        apply(&sheet.catalog, fields, &mut sink);
        print!("{}", render_dry_run(&sink, &settings.config.store.table));
        return Ok(());
    }

    let client = table_client(settings)?;
    let sheet = load_sheet(settings)?;
    println!("Sheet: {} parts", sheet.catalog.len());

    let store = &settings.config.store;
    let mut sink = TableSink::new(&client, &store.table, &store.key_column);
    let outcome = apply(&sheet.catalog, fields, &mut sink);

    print!("{}", render_outcome(&outcome));
    Ok(())
}

pub fn render_outcome(outcome: &SyncOutcome) -> String {
    let mut out = String::new();
    for failure in &outcome.failures {
        let _ = writeln!(out, "  ERROR {}: {}", failure.key, failure.message);
    }
    let _ = writeln!(out, "Updated: {}, Errors: {}", outcome.updated, outcome.error_count());
    out
}

fn render_dry_run(sink: &DryRunSink, table: &str) -> String {
    let mut out = String::new();
    for (key, patch) in &sink.patches {
        let _ = writeln!(out, "  {key}: {} fields", patch.len());
    }
    let _ = writeln!(out, "Dry run: {} updates to {table} not sent", sink.patches.len());
    out
}
