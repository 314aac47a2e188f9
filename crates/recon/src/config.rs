use std::collections::HashSet;
use std::path::PathBuf;

use serde::Deserialize;

use crate::engine::DEFAULT_TOLERANCE;
use crate::error::ReconError;
use crate::fields::{Field, COMPARE_FIELDS, WRITE_FIELDS};
use crate::mapping::{ColumnBinding, SheetMapping, DEFAULT_KEY_COLUMN};

/// Per-request HTTP timeout when `[store] timeout_secs` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run configuration. Every section is optional; `Config::default()` is the
/// built-in behaviour.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sheet: SheetConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub compare: CompareConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

// ---------------------------------------------------------------------------
// Sheet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SheetConfig {
    /// CSV export URL of the authoritative sheet.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_sheet_key_column")]
    pub key_column: String,
    /// Replaces the built-in header table when present.
    #[serde(default)]
    pub columns: Option<Vec<ColumnBinding>>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            url: None,
            key_column: default_sheet_key_column(),
            columns: None,
        }
    }
}

impl SheetConfig {
    pub fn mapping(&self) -> SheetMapping {
        let columns = match &self.columns {
            Some(columns) => columns.clone(),
            None => SheetMapping::default().columns,
        };
        SheetMapping::new(self.key_column.clone(), columns)
    }
}

fn default_sheet_key_column() -> String {
    DEFAULT_KEY_COLUMN.to_string()
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_store_key_column")]
    pub key_column: String,
    #[serde(default)]
    pub credentials: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            key_column: default_store_key_column(),
            credentials: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_table() -> String {
    "bom_final_assemblies".into()
}

fn default_store_key_column() -> String {
    "part_number".into()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

// ---------------------------------------------------------------------------
// Compare + Sync
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CompareConfig {
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_compare_fields")]
    pub fields: Vec<Field>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            fields: default_compare_fields(),
        }
    }
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_compare_fields() -> Vec<Field> {
    COMPARE_FIELDS.to_vec()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_write_fields")]
    pub fields: Vec<Field>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { fields: default_write_fields() }
    }
}

fn default_write_fields() -> Vec<Field> {
    WRITE_FIELDS.to_vec()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl Config {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: Config =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        validate_tolerance(self.compare.tolerance)?;
        validate_field_list("compare.fields", &self.compare.fields)?;
        validate_field_list("sync.fields", &self.sync.fields)?;

        if self.store.table.trim().is_empty() {
            return Err(ReconError::ConfigValidation("store.table must not be empty".into()));
        }
        if self.store.key_column.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "store.key_column must not be empty".into(),
            ));
        }
        if self.store.timeout_secs == 0 {
            return Err(ReconError::ConfigValidation(
                "store.timeout_secs must be at least 1".into(),
            ));
        }
        if let Some(url) = &self.sheet.url {
            if url.trim().is_empty() {
                return Err(ReconError::ConfigValidation("sheet.url must not be empty".into()));
            }
        }

        self.sheet.mapping().validate()
    }
}

pub fn validate_tolerance(tolerance: f64) -> Result<(), ReconError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(ReconError::ConfigValidation(format!(
            "tolerance must be a finite non-negative number, got {tolerance}"
        )));
    }
    Ok(())
}

fn validate_field_list(name: &str, fields: &[Field]) -> Result<(), ReconError> {
    if fields.is_empty() {
        return Err(ReconError::ConfigValidation(format!("{name} must not be empty")));
    }
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field) {
            return Err(ReconError::ConfigValidation(format!(
                "{name} lists '{field}' more than once"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::FieldKind;

    const FULL: &str = r#"
[sheet]
url = "https://example.test/export?format=csv&gid=1"
key_column = "Part name "

[store]
table = "bom_final_assemblies"
key_column = "part_number"
credentials = "/etc/bomsync/credentials.json"
timeout_secs = 15

[compare]
tolerance = 0.01
fields = ["total_cost", "sales_target"]

[sync]
fields = ["total_cost", "sales_target", "profit_amount"]
"#;

    #[test]
    fn empty_config_is_the_default() {
        let config = Config::from_toml("").unwrap();
        assert!(config.sheet.url.is_none());
        assert_eq!(config.sheet.key_column, "Part name ");
        assert_eq!(config.store.table, "bom_final_assemblies");
        assert_eq!(config.store.key_column, "part_number");
        assert_eq!(config.store.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.compare.tolerance, 0.001);
        assert_eq!(config.compare.fields, COMPARE_FIELDS.to_vec());
        assert_eq!(config.sync.fields, Field::ALL.to_vec());
        assert_eq!(config.sheet.mapping(), SheetMapping::default());
    }

    #[test]
    fn parse_full() {
        let config = Config::from_toml(FULL).unwrap();
        assert_eq!(
            config.sheet.url.as_deref(),
            Some("https://example.test/export?format=csv&gid=1")
        );
        assert_eq!(
            config.store.credentials.as_deref(),
            Some(std::path::Path::new("/etc/bomsync/credentials.json"))
        );
        assert_eq!(config.store.timeout_secs, 15);
        assert_eq!(config.compare.tolerance, 0.01);
        assert_eq!(config.compare.fields, vec![Field::TotalCost, Field::SalesTarget]);
        assert_eq!(config.sync.fields.len(), 3);
    }

    #[test]
    fn custom_column_table() {
        let input = r#"
[sheet]
key_column = "SKU"

[[sheet.columns]]
field = "total_cost"
header = "Cost (total) "
kind = "currency"

[[sheet.columns]]
field = "overhead_pct"
header = "OH"
kind = "percentage"
"#;
        let config = Config::from_toml(input).unwrap();
        let mapping = config.sheet.mapping();
        assert_eq!(mapping.key_column, "SKU");
        assert_eq!(mapping.columns.len(), 2);
        let total = mapping.binding(Field::TotalCost).unwrap();
        assert_eq!(total.header, "Cost (total) ");
        assert_eq!(total.kind, FieldKind::Currency);
    }

    #[test]
    fn reject_unknown_field_name() {
        let err = Config::from_toml("[compare]\nfields = [\"total\"]\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn reject_negative_tolerance() {
        let err = Config::from_toml("[compare]\ntolerance = -0.5\n").unwrap_err();
        assert!(err.to_string().contains("tolerance"));
    }

    #[test]
    fn reject_nan_tolerance() {
        assert!(validate_tolerance(f64::NAN).is_err());
        assert!(validate_tolerance(0.0).is_ok());
    }

    #[test]
    fn reject_empty_and_duplicate_field_lists() {
        let err = Config::from_toml("[sync]\nfields = []\n").unwrap_err();
        assert!(err.to_string().contains("sync.fields must not be empty"));

        let err =
            Config::from_toml("[compare]\nfields = [\"total_cost\", \"total_cost\"]\n").unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn reject_duplicate_column_binding() {
        let input = r#"
[[sheet.columns]]
field = "total_cost"
header = "A"
kind = "currency"

[[sheet.columns]]
field = "total_cost"
header = "B"
kind = "currency"
"#;
        assert!(Config::from_toml(input).is_err());
    }

    #[test]
    fn reject_blank_store_settings() {
        assert!(Config::from_toml("[store]\ntable = \" \"\n").is_err());
        assert!(Config::from_toml("[store]\nkey_column = \"\"\n").is_err());
        assert!(Config::from_toml("[store]\ntimeout_secs = 0\n").is_err());
        assert!(Config::from_toml("[sheet]\nurl = \"\"\n").is_err());
    }
}
