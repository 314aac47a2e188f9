//! Target store credentials.
//!
//! Read once at startup from a JSON file:
//! `{ "projectUrl": "https://<project>.example.co", "serviceRoleKey": "..." }`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::RemoteError;

#[derive(Clone, Serialize, Deserialize)]
pub struct StoreCredentials {
    /// Base URL of the REST endpoint, without trailing slash
    #[serde(rename = "projectUrl")]
    pub project_url: String,
    /// Key sent as both `apikey` and bearer token
    #[serde(rename = "serviceRoleKey")]
    pub service_role_key: String,
}

impl StoreCredentials {
    pub fn new(project_url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        Self {
            project_url: project_url.into(),
            service_role_key: service_role_key.into(),
        }
    }
}

impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("project_url", &self.project_url)
            .field("service_role_key", &"<redacted>")
            .finish()
    }
}

/// `<config dir>/bomsync/credentials.json`
pub fn default_credentials_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("bomsync/credentials.json"))
}

/// Load and check credentials. Any problem here is fatal for the run.
pub fn load_credentials(path: &Path) -> Result<StoreCredentials, RemoteError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(RemoteError::CredentialsMissing(path.to_path_buf()));
        }
        Err(e) => return Err(invalid(path, e.to_string())),
    };

    let mut creds: StoreCredentials =
        serde_json::from_str(&contents).map_err(|e| invalid(path, e.to_string()))?;

    creds.project_url = creds.project_url.trim().trim_end_matches('/').to_string();
    creds.service_role_key = creds.service_role_key.trim().to_string();

    if creds.project_url.is_empty() {
        return Err(invalid(path, "projectUrl is empty".into()));
    }
    if !creds.project_url.starts_with("http://") && !creds.project_url.starts_with("https://") {
        return Err(invalid(path, format!("projectUrl is not an http(s) URL: {}", creds.project_url)));
    }
    if creds.service_role_key.is_empty() {
        return Err(invalid(path, "serviceRoleKey is empty".into()));
    }

    Ok(creds)
}

fn invalid(path: &Path, message: String) -> RemoteError {
    RemoteError::CredentialsInvalid { path: path.to_path_buf(), message }
}
