//! CLI Exit Code Registry
//!
//! Single source of truth for `bomsync` exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success (sync also exits 0 when individual records fail) |
//! | 1    | General error (unspecified)                              |
//! | 2    | Usage error (bad arguments, unwritable output)           |
//! | 3    | Config file unreadable or invalid                        |
//! | 4    | Credentials missing or invalid                           |
//! | 5    | Fetching the sheet or the table failed                   |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use bomsync_remote::RemoteError;

/// Success - command completed.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, output file cannot be written.
pub const EXIT_USAGE: u8 = 2;

/// Config file cannot be read, parsed, or fails validation.
/// Also raised when no sheet URL is configured.
pub const EXIT_CONFIG: u8 = 3;

/// Credentials file missing, malformed, or incomplete.
pub const EXIT_CREDENTIALS: u8 = 4;

/// Sheet download, table read, or CSV parse failed. No report is produced.
pub const EXIT_FETCH: u8 = 5;

/// Map a remote error to its exit code.
pub fn remote_exit_code(err: &RemoteError) -> u8 {
    match err {
        RemoteError::CredentialsMissing(_) | RemoteError::CredentialsInvalid { .. } => EXIT_CREDENTIALS,
        RemoteError::Network(_) | RemoteError::Http { .. } | RemoteError::Parse(_) => EXIT_FETCH,
        RemoteError::Client(_) => EXIT_ERROR,
    }
}
