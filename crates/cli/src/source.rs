//! Fetch both sides and turn them into catalogs.

use std::time::Duration;

use bomsync_recon::loader::{catalog_from_sheet_rows, catalog_from_table_rows, parse_sheet_csv};
use bomsync_recon::{Catalog, LoadStats};
use bomsync_remote::{load_credentials, SheetClient, TableClient};
use tracing::info;

use crate::settings::Settings;
use crate::CliError;

/// A loaded side plus its bookkeeping.
pub struct Loaded {
    pub catalog: Catalog,
    pub stats: LoadStats,
}

fn timeout(settings: &Settings) -> Duration {
    Duration::from_secs(settings.config.store.timeout_secs)
}

/// Read credentials and build the table client. Done before any fetch so a
/// bad credentials file fails the run up front.
pub fn table_client(settings: &Settings) -> Result<TableClient, CliError> {
    let creds = load_credentials(&settings.credentials_path).map_err(CliError::remote)?;
    TableClient::new(&creds, timeout(settings)).map_err(CliError::remote)
}

pub fn load_sheet(settings: &Settings) -> Result<Loaded, CliError> {
    let url = settings.sheet_url()?;
    let client = SheetClient::new(url, timeout(settings)).map_err(CliError::remote)?;
    let text = client
        .fetch_csv()
        .map_err(|e| CliError::remote(e).with_context("cannot fetch sheet"))?;
    let rows = parse_sheet_csv(&text).map_err(|e| CliError::fetch(format!("cannot read sheet export: {e}")))?;

    let (catalog, stats) = catalog_from_sheet_rows(&rows, &settings.config.sheet.mapping());
    info!(records = catalog.len(), skipped = stats.skipped, duplicates = stats.duplicates, "sheet loaded");
    Ok(Loaded { catalog, stats })
}

pub fn load_table(settings: &Settings, client: &TableClient) -> Result<Loaded, CliError> {
    let store = &settings.config.store;
    let rows = client
        .fetch_rows(&store.table)
        .map_err(|e| CliError::remote(e).with_context(&format!("cannot read table {}", store.table)))?;

    let (catalog, stats) = catalog_from_table_rows(&rows, &store.key_column);
    info!(records = catalog.len(), skipped = stats.skipped, "table loaded");
    Ok(Loaded { catalog, stats })
}
