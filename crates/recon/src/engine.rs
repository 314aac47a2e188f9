use std::collections::BTreeMap;

use crate::fields::Field;
use crate::model::{Catalog, Divergence, DivergenceReport, Record};

/// Default absolute tolerance for field comparison.
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// Compare the authoritative catalog against the target.
///
/// Keys on one side only are listed (lexically) and never compared. For keys
/// on both sides every field in `fields` is checked; a field diverges when
/// `|a - b| > tolerance` (a difference equal to the tolerance is a match).
pub fn reconcile(
    authoritative: &Catalog,
    target: &Catalog,
    fields: &[Field],
    tolerance: f64,
) -> DivergenceReport {
    let mut only_in_authoritative = Vec::new();
    let mut mismatches = BTreeMap::new();
    let mut compared = 0;

    for (key, a) in authoritative.iter() {
        let Some(b) = target.get(key) else {
            only_in_authoritative.push(key.clone());
            continue;
        };

        compared += 1;
        let divergences = compare_records(a, b, fields, tolerance);
        if !divergences.is_empty() {
            mismatches.insert(key.clone(), divergences);
        }
    }

    let only_in_target: Vec<String> = target
        .keys()
        .filter(|k| !authoritative.contains_key(k))
        .cloned()
        .collect();

    DivergenceReport {
        tolerance,
        fields: fields.to_vec(),
        compared,
        only_in_authoritative,
        only_in_target,
        mismatches,
    }
}

/// Field-level divergences between two records, in `fields` order.
pub fn compare_records(
    authoritative: &Record,
    target: &Record,
    fields: &[Field],
    tolerance: f64,
) -> Vec<Divergence> {
    fields
        .iter()
        .filter_map(|&field| {
            let a = authoritative.get(field);
            let b = target.get(field);
            exceeds_tolerance(a, b, tolerance).then_some(Divergence {
                field,
                authoritative: a,
                target: b,
            })
        })
        .collect()
}

pub fn exceeds_tolerance(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() > tolerance
}
