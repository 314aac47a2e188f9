use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::fields::Field;
use crate::normalize::Normalized;

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One part's cost figures. Every field always has a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: [f64; Field::COUNT],
    defaulted: [bool; Field::COUNT],
}

impl Default for Record {
    fn default() -> Self {
        Self {
            values: [0.0; Field::COUNT],
            defaulted: [true; Field::COUNT],
        }
    }
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by tests and fakes: set one explicit value.
    pub fn with(mut self, field: Field, value: f64) -> Self {
        self.set(field, Normalized::parsed(value));
        self
    }

    pub fn set(&mut self, field: Field, value: Normalized) {
        self.values[field.index()] = value.value;
        self.defaulted[field.index()] = value.defaulted;
    }

    pub fn get(&self, field: Field) -> f64 {
        self.values[field.index()]
    }

    /// True when the value was substituted with zero (blank, unparsable, null, absent).
    pub fn is_defaulted(&self, field: Field) -> bool {
        self.defaulted[field.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, f64)> + '_ {
        Field::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Field::COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.name(), &value)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Part identifier → record. Iterates in lexical key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    records: BTreeMap<String, Record>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the replaced record when the key was already present.
    pub(crate) fn insert(&mut self, key: String, record: Record) -> Option<Record> {
        self.records.insert(key, record)
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.records.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.records.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Record)> {
        self.records.iter()
    }

    /// Number of defaulted values across `fields` in every record.
    pub fn defaulted_cells(&self, fields: &[Field]) -> usize {
        self.records
            .values()
            .map(|r| fields.iter().filter(|f| r.is_defaulted(**f)).count())
            .sum()
    }
}

impl FromIterator<(String, Record)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, Record)>>(iter: I) -> Self {
        Self { records: iter.into_iter().collect() }
    }
}

/// Bookkeeping from one load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub rows_seen: usize,
    /// Rows with a blank or missing key.
    pub skipped: usize,
    /// Rows whose key was already loaded; the later row replaced the earlier.
    pub duplicates: usize,
}

// ---------------------------------------------------------------------------
// Divergences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Divergence {
    pub field: Field,
    pub authoritative: f64,
    pub target: f64,
}

impl Divergence {
    pub fn delta(&self) -> f64 {
        self.authoritative - self.target
    }
}

/// How many keys diverge on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldCount {
    pub field: Field,
    pub keys: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivergenceReport {
    pub tolerance: f64,
    pub fields: Vec<Field>,
    /// Keys present on both sides.
    pub compared: usize,
    pub only_in_authoritative: Vec<String>,
    pub only_in_target: Vec<String>,
    /// Keys with at least one divergence, each with its divergences in field-list order.
    pub mismatches: BTreeMap<String, Vec<Divergence>>,
}

impl DivergenceReport {
    pub fn mismatch_count(&self) -> usize {
        self.mismatches.len()
    }

    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
            && self.only_in_authoritative.is_empty()
            && self.only_in_target.is_empty()
    }

    /// Per-field divergence counts, most unreliable first.
    /// Ties keep canonical field order.
    pub fn field_frequency(&self) -> Vec<FieldCount> {
        let mut counts = [0usize; Field::COUNT];
        for divergences in self.mismatches.values() {
            for d in divergences {
                counts[d.field.index()] += 1;
            }
        }

        let mut freq: Vec<FieldCount> = Field::ALL
            .into_iter()
            .filter(|f| counts[f.index()] > 0)
            .map(|field| FieldCount { field, keys: counts[field.index()] })
            .collect();
        freq.sort_by(|a, b| b.keys.cmp(&a.keys).then(a.field.cmp(&b.field)));
        freq
    }
}
