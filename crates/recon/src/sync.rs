//! Push authoritative records onto the target, one partial update per record.
//!
//! Failures are isolated per record: logged, counted, and the run moves on.
//! There is no retry and no rollback.

use std::convert::Infallible;
use std::fmt::Display;

use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

use crate::fields::Field;
use crate::model::{Catalog, Record};

/// Partial-field update body: field name → JSON number.
pub type RecordPatch = Map<String, Value>;

/// Destination for per-record updates.
pub trait RecordSink {
    type Error: Display;

    /// Apply `patch` to the row identified by `key`.
    fn update(&mut self, key: &str, patch: &RecordPatch) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncFailure {
    pub key: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub updated: usize,
    pub failures: Vec<SyncFailure>,
}

impl SyncOutcome {
    pub fn error_count(&self) -> usize {
        self.failures.len()
    }

    pub fn attempted(&self) -> usize {
        self.updated + self.failures.len()
    }
}

/// Build the update body for one record. Integer-typed fields are truncated.
pub fn build_patch(record: &Record, fields: &[Field]) -> RecordPatch {
    let mut patch = RecordPatch::new();
    for &field in fields {
        let value = record.get(field);
        let json = if field.is_integer() {
            Value::from(value.trunc() as i64)
        } else {
            Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
        };
        patch.insert(field.name().to_string(), json);
    }
    patch
}

/// Send every record in `catalog` to `sink`, carrying `fields`.
pub fn apply<S: RecordSink>(catalog: &Catalog, fields: &[Field], sink: &mut S) -> SyncOutcome {
    let mut outcome = SyncOutcome::default();

    for (key, record) in catalog.iter() {
        let patch = build_patch(record, fields);
        match sink.update(key, &patch) {
            Ok(()) => {
                debug!(key = %key, "updated");
                outcome.updated += 1;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "update failed");
                outcome.failures.push(SyncFailure {
                    key: key.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    outcome
}

/// Collects patches instead of sending them.
#[derive(Debug, Default)]
pub struct DryRunSink {
    pub patches: Vec<(String, RecordPatch)>,
}

impl RecordSink for DryRunSink {
    type Error = Infallible;

    fn update(&mut self, key: &str, patch: &RecordPatch) -> Result<(), Self::Error> {
        self.patches.push((key.to_string(), patch.clone()));
        Ok(())
    }
}
