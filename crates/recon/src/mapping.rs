//! Sheet header → record field table.
//!
//! Headers are matched byte-for-byte. Several of the sheet's headers carry
//! trailing spaces (`"Part name "`, `"number of employees "`); those are part
//! of the key and must not be trimmed.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::fields::Field;
use crate::normalize::FieldKind;

pub const DEFAULT_KEY_COLUMN: &str = "Part name ";

/// One column of the sheet bound to a record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnBinding {
    pub field: Field,
    pub header: String,
    pub kind: FieldKind,
}

impl ColumnBinding {
    pub fn new(field: Field, header: &str, kind: FieldKind) -> Self {
        Self { field, header: header.to_string(), kind }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetMapping {
    pub key_column: String,
    pub columns: Vec<ColumnBinding>,
}

impl SheetMapping {
    pub fn new(key_column: impl Into<String>, columns: Vec<ColumnBinding>) -> Self {
        Self { key_column: key_column.into(), columns }
    }

    pub fn binding(&self, field: Field) -> Option<&ColumnBinding> {
        self.columns.iter().find(|b| b.field == field)
    }

    /// Fields with no bound column; these always load as defaulted zeros.
    pub fn unbound_fields(&self) -> Vec<Field> {
        Field::ALL.into_iter().filter(|f| self.binding(*f).is_none()).collect()
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.key_column.trim().is_empty() {
            return Err(ReconError::ConfigValidation("sheet key column must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for binding in &self.columns {
            if !seen.insert(binding.field) {
                return Err(ReconError::ConfigValidation(format!(
                    "field '{}' is bound to more than one sheet column",
                    binding.field
                )));
            }
            if binding.header == self.key_column {
                return Err(ReconError::ConfigValidation(format!(
                    "field '{}' is bound to the key column '{}'",
                    binding.field, self.key_column
                )));
            }
        }

        Ok(())
    }
}

impl Default for SheetMapping {
    fn default() -> Self {
        use Field::*;
        use FieldKind::*;

        let columns = vec![
            ColumnBinding::new(PartsPerPackage, "Parts per package", PlainNumber),
            ColumnBinding::new(PartsPerHour, "Parts per hour", PlainNumber),
            ColumnBinding::new(LaborRatePerHour, "Labor Cost/hr", Currency),
            ColumnBinding::new(NumEmployees, "number of employees ", PlainNumber),
            ColumnBinding::new(LaborCostPerPart, "Labor cost / finished part", Currency),
            ColumnBinding::new(ShippingLaborCost, "Shipping/staging/QA labor cost ", Currency),
            ColumnBinding::new(SubtotalCost, "Sub total cost", Currency),
            ColumnBinding::new(OverheadPct, "Overhead %", Percentage),
            ColumnBinding::new(OverheadCost, "Overhead cost", Currency),
            ColumnBinding::new(AdminPct, "Administrative expense %", Percentage),
            ColumnBinding::new(AdminCost, "Administrative expense cost", Currency),
            ColumnBinding::new(DepreciationPct, "Depreciation %", Percentage),
            ColumnBinding::new(DepreciationCost, "Depreciation Cost", Currency),
            ColumnBinding::new(RepairsPct, "Repairs & Supplies COGS%", Percentage),
            ColumnBinding::new(RepairsCost, "Repairs & Supplies COGS Cost", Currency),
            ColumnBinding::new(VariableCost, "Variable Cost", Currency),
            ColumnBinding::new(TotalCost, "Total Cost", Currency),
            ColumnBinding::new(ProfitTargetPct, "Profit Target", Percentage),
            ColumnBinding::new(ProfitAmount, "Profit Total", Currency),
            ColumnBinding::new(SalesTarget, "Sales target", Currency),
        ];

        Self::new(DEFAULT_KEY_COLUMN, columns)
    }
}
