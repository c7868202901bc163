use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::category::Category;
use crate::models::transaction::Transaction;

use super::traits::{CategoryStore, TransactionStore};

/// In-process store holding fixed collections for any number of users.
///
/// Serves the same filtering the remote store applies: only the caller's
/// rows, only active categories, categories by sort order and
/// transactions newest first.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(categories: Vec<Category>, transactions: Vec<Transaction>) -> Self {
        Self {
            categories,
            transactions,
        }
    }

    pub fn push_category(&mut self, category: Category) {
        self.categories.push(category);
    }

    pub fn push_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl CategoryStore for InMemoryStore {
    fn name(&self) -> &str {
        "InMemory"
    }

    async fn fetch_categories(&self, user_id: Uuid) -> Result<Vec<Category>, CoreError> {
        let mut categories: Vec<Category> = self
            .categories
            .iter()
            .filter(|c| c.user_id == user_id && c.is_active)
            .cloned()
            .collect();
        categories.sort_by_key(|c| c.sort_order);
        Ok(categories)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TransactionStore for InMemoryStore {
    fn name(&self) -> &str {
        "InMemory"
    }

    async fn fetch_transactions(&self, user_id: Uuid) -> Result<Vec<Transaction>, CoreError> {
        let mut transactions: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        Ok(transactions)
    }
}
