#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Config validation error (bad tolerance, duplicate field, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),

    /// The sheet export could not be read as CSV at all.
    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),
}
