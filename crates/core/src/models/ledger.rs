use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;
use super::settings::Settings;
use super::transaction::Transaction;

/// The data container for one user: categories, transactions and settings.
///
/// Summaries and allocations are never stored here; they are recomputed
/// from these collections on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    /// Owner of every category and transaction below
    pub user_id: Uuid,

    /// All categories, soft-deleted ones included
    pub categories: Vec<Category>,

    /// All recorded transactions, in insertion order
    pub transactions: Vec<Transaction>,

    #[serde(default)]
    pub settings: Settings,
}

impl Ledger {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            categories: Vec::new(),
            transactions: Vec::new(),
            settings: Settings::default(),
        }
    }

    /// Next free category id (stores hand out increasing integers).
    ///
    /// Ids referenced by transactions count as taken even when their
    /// category is not loaded, so history never moves to a new category.
    #[must_use]
    pub fn next_category_id(&self) -> i64 {
        let highest_category = self.categories.iter().map(|c| c.id).max().unwrap_or(0);
        let highest_referenced = self
            .transactions
            .iter()
            .map(|t| t.category_id)
            .max()
            .unwrap_or(0);
        highest_category.max(highest_referenced) + 1
    }

    #[must_use]
    pub fn next_transaction_id(&self) -> i64 {
        self.transactions.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }
}
