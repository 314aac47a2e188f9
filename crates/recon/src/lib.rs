//! `bomsync-recon`: reconciliation engine for BOM cost data.
//!
//! Pure engine crate: normalizes sheet cells, builds catalogs from the sheet
//! export and the target table rows, and reports field-level divergences.
//! No HTTP or CLI dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod fields;
pub mod loader;
pub mod mapping;
pub mod model;
pub mod normalize;
pub mod sync;

pub use config::{Config, DEFAULT_TIMEOUT_SECS};
pub use engine::{reconcile, DEFAULT_TOLERANCE};
pub use error::ReconError;
pub use fields::{Field, COMPARE_FIELDS, WRITE_FIELDS};
pub use mapping::{ColumnBinding, SheetMapping};
pub use model::{Catalog, Divergence, DivergenceReport, FieldCount, LoadStats, Record};
pub use normalize::{normalize, parse_dollar, parse_num, parse_pct, FieldKind};
pub use sync::{RecordPatch, RecordSink, SyncOutcome};
