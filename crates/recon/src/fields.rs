use serde::{Deserialize, Serialize};

/// Every numeric field a cost record carries, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    PartsPerPackage,
    PartsPerHour,
    LaborRatePerHour,
    NumEmployees,
    LaborCostPerPart,
    ShippingLaborCost,
    SubtotalCost,
    OverheadPct,
    OverheadCost,
    AdminPct,
    AdminCost,
    DepreciationPct,
    DepreciationCost,
    RepairsPct,
    RepairsCost,
    VariableCost,
    TotalCost,
    ProfitTargetPct,
    ProfitAmount,
    SalesTarget,
}

impl Field {
    pub const COUNT: usize = 20;

    pub const ALL: [Field; Field::COUNT] = [
        Field::PartsPerPackage,
        Field::PartsPerHour,
        Field::LaborRatePerHour,
        Field::NumEmployees,
        Field::LaborCostPerPart,
        Field::ShippingLaborCost,
        Field::SubtotalCost,
        Field::OverheadPct,
        Field::OverheadCost,
        Field::AdminPct,
        Field::AdminCost,
        Field::DepreciationPct,
        Field::DepreciationCost,
        Field::RepairsPct,
        Field::RepairsCost,
        Field::VariableCost,
        Field::TotalCost,
        Field::ProfitTargetPct,
        Field::ProfitAmount,
        Field::SalesTarget,
    ];

    /// Column name in the target table.
    pub fn name(self) -> &'static str {
        match self {
            Self::PartsPerPackage => "parts_per_package",
            Self::PartsPerHour => "parts_per_hour",
            Self::LaborRatePerHour => "labor_rate_per_hour",
            Self::NumEmployees => "num_employees",
            Self::LaborCostPerPart => "labor_cost_per_part",
            Self::ShippingLaborCost => "shipping_labor_cost",
            Self::SubtotalCost => "subtotal_cost",
            Self::OverheadPct => "overhead_pct",
            Self::OverheadCost => "overhead_cost",
            Self::AdminPct => "admin_pct",
            Self::AdminCost => "admin_cost",
            Self::DepreciationPct => "depreciation_pct",
            Self::DepreciationCost => "depreciation_cost",
            Self::RepairsPct => "repairs_pct",
            Self::RepairsCost => "repairs_cost",
            Self::VariableCost => "variable_cost",
            Self::TotalCost => "total_cost",
            Self::ProfitTargetPct => "profit_target_pct",
            Self::ProfitAmount => "profit_amount",
            Self::SalesTarget => "sales_target",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Position in [`Field::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Integer-typed in the target table; written truncated.
    pub fn is_integer(self) -> bool {
        matches!(self, Self::PartsPerPackage)
    }

    /// Amounts computed from other fields rather than maintained by hand.
    pub fn is_derived(self) -> bool {
        matches!(
            self,
            Self::OverheadCost
                | Self::AdminCost
                | Self::DepreciationCost
                | Self::RepairsCost
                | Self::ProfitAmount
        )
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fields compared by default: everything except the derived cost amounts.
pub const COMPARE_FIELDS: [Field; 15] = [
    Field::PartsPerPackage,
    Field::PartsPerHour,
    Field::LaborRatePerHour,
    Field::NumEmployees,
    Field::LaborCostPerPart,
    Field::ShippingLaborCost,
    Field::SubtotalCost,
    Field::OverheadPct,
    Field::AdminPct,
    Field::DepreciationPct,
    Field::RepairsPct,
    Field::VariableCost,
    Field::TotalCost,
    Field::ProfitTargetPct,
    Field::SalesTarget,
];

/// Fields pushed to the target table by default.
pub const WRITE_FIELDS: [Field; Field::COUNT] = Field::ALL;
