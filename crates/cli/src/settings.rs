//! Config and credential path resolution.
//!
//! Config: `--config` / `BOMSYNC_CONFIG` > `<config dir>/bomsync/config.toml`
//! if it exists > built-in defaults.
//! Credentials: `--credentials` / `BOMSYNC_CREDENTIALS` > `[store] credentials`
//! > `<config dir>/bomsync/credentials.json`.
//!
//! Flag and environment precedence is handled by clap; this module only sees
//! the merged value.

use std::path::{Path, PathBuf};

use bomsync_recon::Config;
use tracing::debug;

use crate::exit_codes::EXIT_CREDENTIALS;
use crate::CliError;

/// Effective run settings after all sources are merged.
#[derive(Debug)]
pub struct Settings {
    pub config: Config,
    /// Config file actually read, if any.
    pub config_path: Option<PathBuf>,
    pub credentials_path: PathBuf,
}

impl Settings {
    pub fn resolve(
        config_flag: Option<&Path>,
        credentials_flag: Option<&Path>,
        sheet_url_flag: Option<&str>,
    ) -> Result<Self, CliError> {
        let config_dir = dirs::config_dir();
        let config_path = resolve_config_path(config_flag, config_dir.as_deref());
        let mut config = load_config(config_path.as_deref())?;

        if let Some(url) = sheet_url_flag {
            config.sheet.url = Some(url.to_string());
        }

        let credentials_path = resolve_credentials_path(
            credentials_flag,
            config.store.credentials.as_deref(),
            config_dir.as_deref(),
        )?;

        match &config_path {
            Some(path) => debug!(config = %path.display(), credentials = %credentials_path.display(), "settings resolved"),
            None => debug!(credentials = %credentials_path.display(), "settings resolved without a config file"),
        }
        Ok(Self { config, config_path, credentials_path })
    }

    pub fn sheet_url(&self) -> Result<&str, CliError> {
        self.config.sheet.url.as_deref().ok_or_else(|| {
            CliError::config("no sheet export URL configured")
                .with_hint("set `url` under [sheet] in the config file, or pass --sheet-url")
        })
    }
}

pub fn resolve_config_path(flag: Option<&Path>, config_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = flag {
        return Some(path.to_path_buf());
    }
    let candidate = config_dir?.join("bomsync/config.toml");
    candidate.is_file().then_some(candidate)
}

/// Read and validate the config, or fall back to defaults when there is none.
pub fn load_config(path: Option<&Path>) -> Result<Config, CliError> {
    let Some(path) = path else {
        debug!("no config file, using built-in defaults");
        return Ok(Config::default());
    };

    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::config(format!("cannot read config {}: {e}", path.display()))
    })?;
    let config = Config::from_toml(&text)
        .map_err(|e| CliError::config(format!("{}: {e}", path.display())))?;

    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

pub fn resolve_credentials_path(
    flag: Option<&Path>,
    from_config: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<PathBuf, CliError> {
    if let Some(path) = flag.or(from_config) {
        return Ok(path.to_path_buf());
    }
    match config_dir {
        Some(dir) => Ok(dir.join("bomsync/credentials.json")),
        None => Err(CliError {
            code: EXIT_CREDENTIALS,
            message: "cannot determine a credentials path on this platform".into(),
            hint: Some("pass --credentials or set BOMSYNC_CREDENTIALS".into()),
        }),
    }
}
