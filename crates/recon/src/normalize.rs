//! Cell normalization: human-maintained sheet text → finite `f64`.
//!
//! A bad cell never fails a load. Blank, unparsable and non-finite input
//! degrade to `0.0` and are flagged as defaulted so the discrepancy can
//! surface downstream instead.

use serde::{Deserialize, Serialize};

/// Declared format of a sheet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// `"12.5%"` → `0.125`
    Percentage,
    /// `"$1,234.50"` → `1234.5`
    Currency,
    /// `"2,048"` → `2048.0`
    PlainNumber,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Percentage => write!(f, "percentage"),
            Self::Currency => write!(f, "currency"),
            Self::PlainNumber => write!(f, "plain_number"),
        }
    }
}

/// A normalized value plus whether it was substituted with zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalized {
    pub value: f64,
    pub defaulted: bool,
}

impl Normalized {
    pub const DEFAULTED: Normalized = Normalized { value: 0.0, defaulted: true };

    pub fn parsed(value: f64) -> Self {
        Self { value, defaulted: false }
    }
}

/// Normalize a raw cell, keeping the defaulted marker.
pub fn normalize_cell(raw: Option<&str>, kind: FieldKind) -> Normalized {
    let Some(raw) = raw else {
        return Normalized::DEFAULTED;
    };

    let parsed = match kind {
        FieldKind::Percentage => parse_finite(&strip_chars(raw, &['%'])).map(|v| v / 100.0),
        FieldKind::Currency => parse_finite(&strip_chars(raw, &['$', ','])),
        FieldKind::PlainNumber => parse_finite(&strip_chars(raw, &[','])),
    };

    parsed.map(Normalized::parsed).unwrap_or(Normalized::DEFAULTED)
}

/// Normalize a raw cell. Never fails; bad input yields `0.0`.
pub fn normalize(raw: Option<&str>, kind: FieldKind) -> f64 {
    normalize_cell(raw, kind).value
}

pub fn parse_pct(raw: &str) -> f64 {
    normalize(Some(raw), FieldKind::Percentage)
}

pub fn parse_dollar(raw: &str) -> f64 {
    normalize(Some(raw), FieldKind::Currency)
}

pub fn parse_num(raw: &str) -> f64 {
    normalize(Some(raw), FieldKind::PlainNumber)
}

fn strip_chars(raw: &str, chars: &[char]) -> String {
    raw.trim().chars().filter(|c| !chars.contains(c)).collect()
}

fn parse_finite(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
