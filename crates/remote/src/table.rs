//! Target table access over a PostgREST-style endpoint.
//!
//! `GET  {base}/rest/v1/{table}?select=*` for the bulk read and
//! `PATCH {base}/rest/v1/{table}?{key_column}=eq.{key}` for partial updates.
//! Every request carries the service key as both `apikey` and bearer token.

use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::credentials::StoreCredentials;
use crate::error::RemoteError;
use crate::http::{build_client, send};

/// One row of the target table, column name to JSON value.
pub type Row = Map<String, Value>;

#[derive(Clone)]
pub struct TableClient {
    http: reqwest::blocking::Client,
    base_url: String,
    key: String,
}

impl TableClient {
    pub fn new(creds: &StoreCredentials, timeout: Duration) -> Result<Self, RemoteError> {
        Self::with_base_url(&creds.project_url, &creds.service_role_key, timeout)
    }

    pub fn with_base_url(base_url: &str, key: &str, timeout: Duration) -> Result<Self, RemoteError> {
        Ok(Self {
            http: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
        })
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authed(&self, request: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        request.header("apikey", &self.key).bearer_auth(&self.key)
    }

    /// Read every row of `table`.
    pub fn fetch_rows(&self, table: &str) -> Result<Vec<Row>, RemoteError> {
        let url = self.endpoint(table);
        debug!(%url, "fetching table rows");

        let response = send(self.authed(self.http.get(&url)).query(&[("select", "*")]))?;
        let body: Value = response
            .json()
            .map_err(|e| RemoteError::Parse(format!("table response is not JSON: {e}")))?;

        let Value::Array(items) = body else {
            return Err(RemoteError::Parse("expected a JSON array of rows".into()));
        };

        let rows = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(row) => Ok(row),
                other => Err(RemoteError::Parse(format!("row {i} is not an object: {other}"))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(table, rows = rows.len(), "table rows fetched");
        Ok(rows)
    }

    /// Partially update the row(s) where `key_column` equals `key`.
    ///
    /// Only the columns present in `body` change. The endpoint answers
    /// with an empty body (`Prefer: return=minimal`); zero matching rows
    /// is still a success.
    pub fn update_row(&self, table: &str, key_column: &str, key: &str, body: &Row) -> Result<(), RemoteError> {
        let filter = format!("eq.{key}");
        let request = self
            .authed(self.http.patch(self.endpoint(table)))
            .query(&[(key_column, filter.as_str())])
            .header("Prefer", "return=minimal")
            .json(body);

        send(request)?;
        debug!(table, key, columns = body.len(), "row updated");
        Ok(())
    }
}
