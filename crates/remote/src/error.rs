use std::path::PathBuf;

/// Error type for sheet and table operations.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// No credentials file at the resolved path
    #[error("credentials file not found: {}", .0.display())]
    CredentialsMissing(PathBuf),

    /// Credentials file unreadable, malformed, or missing a value
    #[error("invalid credentials file {}: {message}", path.display())]
    CredentialsInvalid { path: PathBuf, message: String },

    /// Transport failure (DNS, connect, TLS, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status with the response body
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("parse error: {0}")]
    Parse(String),

    /// HTTP client could not be constructed
    #[error("cannot build HTTP client: {0}")]
    Client(String),
}

impl RemoteError {
    /// True for 401/403 responses.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Http { status: 401 | 403, .. })
    }
}
