use tracing::debug;

use crate::models::allocation::{
    AllocationStatus, PortfolioAllocation, PortfolioSummary, RebalanceSuggestion,
};
use crate::models::category::Category;
use crate::models::transaction::Transaction;

/// Computes target-vs-actual allocation of the investment pool and
/// rebalancing suggestions for a new deposit.
///
/// Inputs are trusted: the caller passes only investment categories and
/// only transactions belonging to them. A savings deposit that slipped in
/// here would skew every percentage.
pub struct AllocationService;

impl AllocationService {
    pub fn new() -> Self {
        Self
    }

    /// Current vs. target share for each category, in input order.
    ///
    /// With an empty pool every `current_percent` is 0 and every
    /// `difference` is `-target_percent`.
    pub fn compute_allocations(
        &self,
        categories: &[Category],
        transactions: &[Transaction],
    ) -> PortfolioSummary {
        let total_investment: i64 = transactions.iter().map(|t| t.amount).sum();

        let allocations = categories
            .iter()
            .map(|category| {
                let current_amount: i64 = transactions
                    .iter()
                    .filter(|t| t.category_id == category.id)
                    .map(|t| t.amount)
                    .sum();

                let current_percent = if total_investment > 0 {
                    current_amount as f64 / total_investment as f64 * 100.0
                } else {
                    0.0
                };
                let target_percent = category.effective_target_percent();

                PortfolioAllocation {
                    category: category.clone(),
                    current_amount,
                    current_percent: round_2(current_percent),
                    target_percent,
                    difference: round_2(current_percent - target_percent),
                }
            })
            .collect();

        debug!(
            categories = categories.len(),
            total_investment,
            "computed portfolio allocations"
        );

        PortfolioSummary {
            total_investment,
            allocations,
        }
    }

    /// Suggested contribution per category when `additional_amount` is added
    /// to the pool.
    ///
    /// Each category independently gets `max(0, target share of the new
    /// pool - current amount)`, rounded to a whole unit. Categories above
    /// target get exactly 0 and their excess is not redistributed, so the
    /// suggestions need not add up to `additional_amount`.
    /// A negative `additional_amount` is treated as 0; a pool past `i64::MAX`
    /// saturates.
    pub fn rebalance(
        &self,
        summary: &PortfolioSummary,
        additional_amount: i64,
    ) -> Vec<RebalanceSuggestion> {
        let additional = additional_amount.max(0);
        let new_total = summary.total_investment.saturating_add(additional) as f64;

        summary
            .allocations
            .iter()
            .map(|a| {
                let target_amount = a.target_percent / 100.0 * new_total;
                let needed = (target_amount - a.current_amount as f64).max(0.0);
                RebalanceSuggestion {
                    category_id: a.category.id,
                    name: a.category.name.clone(),
                    amount: round_half_up(needed) as i64,
                }
            })
            .collect()
    }

    /// Allocations sorted by `difference` ascending (most underweight first).
    pub fn by_difference<'a>(&self, summary: &'a PortfolioSummary) -> Vec<&'a PortfolioAllocation> {
        let mut sorted: Vec<&PortfolioAllocation> = summary.allocations.iter().collect();
        sorted.sort_by(|a, b| a.difference.total_cmp(&b.difference));
        sorted
    }

    /// Allocations sorted by target weight, largest first.
    pub fn by_target<'a>(&self, summary: &'a PortfolioSummary) -> Vec<&'a PortfolioAllocation> {
        let mut sorted: Vec<&PortfolioAllocation> = summary.allocations.iter().collect();
        sorted.sort_by(|a, b| b.target_percent.total_cmp(&a.target_percent));
        sorted
    }

    /// Allocations whose status under `tolerance` equals `status`.
    pub fn with_status<'a>(
        &self,
        summary: &'a PortfolioSummary,
        status: AllocationStatus,
        tolerance: f64,
    ) -> Vec<&'a PortfolioAllocation> {
        summary
            .allocations
            .iter()
            .filter(|a| a.status(tolerance) == status)
            .collect()
    }

    /// Sum of targets over `categories`; 100 when the plan is complete.
    pub fn total_target_percent(&self, categories: &[Category]) -> f64 {
        categories.iter().map(Category::effective_target_percent).sum()
    }
}

impl Default for AllocationService {
    fn default() -> Self {
        Self::new()
    }
}

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to 2 decimals, halves toward positive infinity.
pub(crate) fn round_2(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}
