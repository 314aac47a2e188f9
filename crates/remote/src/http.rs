use std::time::Duration;

use crate::error::RemoteError;

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::blocking::Client, RemoteError> {
    reqwest::blocking::Client::builder()
        .user_agent(format!("bomsync/{}", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| RemoteError::Client(e.to_string()))
}

/// Send a request and turn any non-2xx status into `RemoteError::Http`.
pub(crate) fn send(
    request: reqwest::blocking::RequestBuilder,
) -> Result<reqwest::blocking::Response, RemoteError> {
    let response = request.send().map_err(|e| RemoteError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(RemoteError::Http { status: status.as_u16(), body: body.trim().to_string() });
    }

    Ok(response)
}
