//! Published-sheet download.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::RemoteError;
use crate::http::{build_client, send};

/// Fetches the sheet's CSV export from a public URL. No authentication.
pub struct SheetClient {
    http: reqwest::blocking::Client,
    url: String,
}

impl SheetClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        Ok(Self { http: build_client(timeout)?, url: url.into() })
    }

    /// Download the export body as text. Redirects are followed.
    pub fn fetch_csv(&self) -> Result<String, RemoteError> {
        debug!(url = %self.url, "fetching sheet export");
        let response = send(self.http.get(&self.url))?;
        let body = response
            .text()
            .map_err(|e| RemoteError::Parse(format!("sheet body is not text: {e}")))?;
        info!(bytes = body.len(), "sheet export downloaded");
        Ok(body)
    }
}
