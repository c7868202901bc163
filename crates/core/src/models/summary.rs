use serde::{Deserialize, Serialize};

use super::category::Category;

/// Totals for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,

    /// Sum of amounts recorded against this category
    pub total: i64,

    /// Number of transactions recorded against this category
    pub count: usize,
}

/// Amount recorded for one category inside a month bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub category_id: i64,
    pub amount: i64,
}

/// Totals for one calendar month that has at least one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Month key in `YYYY-MM` form
    pub month: String,

    /// Sum of all amounts dated in this month
    pub total: i64,

    /// Per-category sub-totals, ordered by ascending category id
    pub by_category: Vec<CategoryAmount>,
}

impl MonthlySummary {
    /// An empty bucket for a month with no transactions.
    pub fn empty(month: impl Into<String>) -> Self {
        Self {
            month: month.into(),
            total: 0,
            by_category: Vec::new(),
        }
    }

    /// Sub-total for a category in this month, 0 when it has none.
    #[must_use]
    pub fn amount_for(&self, category_id: i64) -> i64 {
        self.by_category
            .binary_search_by_key(&category_id, |c| c.category_id)
            .map(|idx| self.by_category[idx].amount)
            .unwrap_or(0)
    }
}

/// Aggregate view over a list of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingSummary {
    /// Sum of every transaction passed in, matched to a category or not
    pub total: i64,

    /// One entry per category passed in, in the same order
    pub by_category: Vec<CategorySummary>,

    /// Month buckets present in the data, newest first
    pub by_month: Vec<MonthlySummary>,
}

impl SavingSummary {
    /// Look up a month bucket, falling back to an empty one.
    ///
    /// A month without transactions is a normal state, not an error.
    #[must_use]
    pub fn month(&self, month: &str) -> MonthlySummary {
        self.by_month
            .iter()
            .find(|m| m.month == month)
            .cloned()
            .unwrap_or_else(|| MonthlySummary::empty(month))
    }

    /// Category entries that actually hold money (for pie charts).
    #[must_use]
    pub fn non_empty_categories(&self) -> Vec<&CategorySummary> {
        self.by_category.iter().filter(|c| c.total > 0).collect()
    }
}
