//! `bomsync-remote`: HTTP access to the two data sources.
//!
//! Blocking reqwest clients (no Tokio runtime required): one downloads the
//! published sheet as CSV, the other reads and patches rows in the target
//! table over its REST endpoint.

pub mod credentials;
pub mod error;
mod http;
pub mod sheet;
pub mod table;

pub use credentials::{default_credentials_path, load_credentials, StoreCredentials};
pub use error::RemoteError;
pub use sheet::SheetClient;
pub use table::TableClient;
