// bomsync CLI - compare and sync BOM cost data between the published sheet
// and the cost table.

mod compare;
mod exit_codes;
mod fields;
mod logging;
mod settings;
mod source;
mod sync;

use std::path::PathBuf;
use std::process::ExitCode;

use bomsync_remote::RemoteError;
use clap::{Parser, Subcommand};

use exit_codes::{remote_exit_code, EXIT_CONFIG, EXIT_ERROR, EXIT_FETCH, EXIT_SUCCESS, EXIT_USAGE};
use settings::Settings;

#[derive(Parser)]
#[command(name = "bomsync")]
#[command(about = "Compare and sync BOM cost data between a published sheet and the cost table")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Config file (TOML)
    #[arg(long, global = true, env = "BOMSYNC_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Credentials file ({"projectUrl": ..., "serviceRoleKey": ...})
    #[arg(long, global = true, env = "BOMSYNC_CREDENTIALS", value_name = "PATH")]
    credentials: Option<PathBuf>,

    /// Sheet CSV export URL (overrides [sheet] url)
    #[arg(long, global = true, env = "BOMSYNC_SHEET_URL", value_name = "URL")]
    sheet_url: Option<String>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report parts whose table values differ from the sheet
    #[command(after_help = "\
Examples:
  bomsync compare
  bomsync compare --all-fields
  bomsync compare --tolerance 0.01
  bomsync compare --json > report.json
  bomsync compare --output report.json")]
    Compare {
        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Also write the JSON report to a file
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,

        /// Compare every field, including derived cost amounts
        #[arg(long)]
        all_fields: bool,

        /// Absolute difference ignored per field (default 0.001)
        #[arg(long)]
        tolerance: Option<f64>,
    },

    /// Overwrite table values with the sheet's, one update per part
    #[command(after_help = "\
Examples:
  bomsync sync --dry-run
  bomsync sync
  bomsync -v sync --credentials ./credentials.json")]
    Sync {
        /// Build the updates but do not send them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the sheet header → field table in effect
    Fields {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { config, credentials, sheet_url, command, .. } = cli;
    let resolve = || Settings::resolve(config.as_deref(), credentials.as_deref(), sheet_url.as_deref());

    match command {
        Commands::Compare { json, output, all_fields, tolerance } => compare::cmd_compare(
            &resolve()?,
            compare::CompareOptions { json, output, all_fields, tolerance },
        ),
        Commands::Sync { dry_run } => sync::cmd_sync(&resolve()?, dry_run),
        Commands::Fields { json } => {
            // No credentials or network needed.
            let path = settings::resolve_config_path(config.as_deref(), dirs::config_dir().as_deref());
            let config = settings::load_config(path.as_deref())?;
            fields::cmd_fields(&config, json)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self { code: EXIT_FETCH, message: msg.into(), hint: None }
    }

    /// Create error from a remote error with proper exit code.
    pub fn remote(err: RemoteError) -> Self {
        let code = remote_exit_code(&err);
        let hint = match &err {
            RemoteError::CredentialsMissing(_) => Some(
                "create it as {\"projectUrl\": \"https://...\", \"serviceRoleKey\": \"...\"} or pass --credentials"
                    .to_string(),
            ),
            RemoteError::CredentialsInvalid { .. } => {
                Some("expected keys: projectUrl, serviceRoleKey".to_string())
            }
            e if e.is_auth() => Some("check serviceRoleKey in the credentials file".to_string()),
            RemoteError::Network(_) => Some("check the URL and your network connection".to_string()),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Prefix the message, e.g. "cannot fetch sheet: HTTP 404: ...".
    pub fn with_context(mut self, context: &str) -> Self {
        self.message = format!("{context}: {}", self.message);
        self
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
