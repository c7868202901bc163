use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::category::Category;
use crate::models::summary::{CategoryAmount, CategorySummary, MonthlySummary, SavingSummary};
use crate::models::transaction::Transaction;

/// Reduces transactions and categories into totals, per-category and
/// per-month breakdowns.
///
/// Pure business logic: no I/O, no shared state. Callers filter and order
/// the category list before calling; the summary mirrors it as given.
pub struct SummaryService;

impl SummaryService {
    pub fn new() -> Self {
        Self
    }

    /// Build a full summary of `transactions` against `categories`.
    ///
    /// - `total` counts every transaction, including ones whose category
    ///   is not in `categories` (e.g. soft-deleted).
    /// - `by_category` has exactly one entry per given category, zero-total
    ///   entries included, in the given order.
    /// - `by_month` only holds months that have transactions, newest first.
    pub fn build_summary(
        &self,
        transactions: &[Transaction],
        categories: &[Category],
    ) -> SavingSummary {
        let total: i64 = transactions.iter().map(|t| t.amount).sum();

        let by_category = categories
            .iter()
            .map(|category| {
                let (sum, count) = transactions
                    .iter()
                    .filter(|t| t.category_id == category.id)
                    .fold((0i64, 0usize), |(sum, count), t| (sum + t.amount, count + 1));
                CategorySummary {
                    category: category.clone(),
                    total: sum,
                    count,
                }
            })
            .collect();

        let by_month = self.monthly_buckets(transactions);

        debug!(
            transactions = transactions.len(),
            categories = categories.len(),
            months = by_month.len(),
            total,
            "built saving summary"
        );

        SavingSummary {
            total,
            by_category,
            by_month,
        }
    }

    /// Find the bucket for `month` (`YYYY-MM`), or an empty one.
    pub fn month_summary(&self, summary: &SavingSummary, month: &str) -> MonthlySummary {
        summary.month(month)
    }

    /// Bucket for the month containing `today`.
    pub fn current_month_summary(&self, summary: &SavingSummary, today: NaiveDate) -> MonthlySummary {
        summary.month(&Self::month_key(today))
    }

    /// `YYYY-MM` key for the calendar month of `date`.
    #[must_use]
    pub fn month_key(date: NaiveDate) -> String {
        date.format("%Y-%m").to_string()
    }

    #[must_use]
    pub fn is_current_month(date: NaiveDate, today: NaiveDate) -> bool {
        Self::month_key(date) == Self::month_key(today)
    }

    fn monthly_buckets(&self, transactions: &[Transaction]) -> Vec<MonthlySummary> {
        // month -> (total, category_id -> amount); both maps keep keys sorted
        let mut months: BTreeMap<String, (i64, BTreeMap<i64, i64>)> = BTreeMap::new();

        for t in transactions {
            let entry = months
                .entry(Self::month_key(t.transaction_date))
                .or_insert_with(|| (0, BTreeMap::new()));
            entry.0 += t.amount;
            *entry.1.entry(t.category_id).or_insert(0) += t.amount;
        }

        // `YYYY-MM` sorts lexicographically in chronological order
        months
            .into_iter()
            .rev()
            .map(|(month, (total, per_category))| MonthlySummary {
                month,
                total,
                by_category: per_category
                    .into_iter()
                    .map(|(category_id, amount)| CategoryAmount { category_id, amount })
                    .collect(),
            })
            .collect()
    }
}

impl Default for SummaryService {
    fn default() -> Self {
        Self::new()
    }
}
