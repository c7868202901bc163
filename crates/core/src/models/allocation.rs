use serde::{Deserialize, Serialize};

use super::category::Category;

/// Current vs. target share of one investment category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAllocation {
    pub category: Category,

    /// Sum of amounts invested in this category
    pub current_amount: i64,

    /// Share of the total investment pool, rounded to 2 decimals
    pub current_percent: f64,

    /// Target share taken from the category
    pub target_percent: f64,

    /// `current_percent - target_percent`, rounded to 2 decimals
    pub difference: f64,
}

impl PortfolioAllocation {
    /// Classify against a tolerance in percentage points.
    #[must_use]
    pub fn status(&self, tolerance: f64) -> AllocationStatus {
        if self.difference < -tolerance {
            AllocationStatus::Underweight
        } else if self.difference > tolerance {
            AllocationStatus::Overweight
        } else {
            AllocationStatus::Balanced
        }
    }
}

/// Whether a category sits below, above, or near its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationStatus {
    Underweight,
    Balanced,
    Overweight,
}

impl std::fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationStatus::Underweight => write!(f, "underweight"),
            AllocationStatus::Balanced => write!(f, "balanced"),
            AllocationStatus::Overweight => write!(f, "overweight"),
        }
    }
}

/// The investment pool and its per-category allocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Sum of every investment transaction
    pub total_investment: i64,

    /// One entry per investment category, in input order
    pub allocations: Vec<PortfolioAllocation>,
}

/// Suggested contribution to one category for a rebalancing deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebalanceSuggestion {
    pub category_id: i64,
    pub name: String,
    /// Whole currency units, never negative
    pub amount: i64,
}
