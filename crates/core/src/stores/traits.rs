use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::category::Category;
use crate::models::transaction::Transaction;

/// Source of a user's categories (the remote data store, a cache, a fixture).
///
/// The engines never talk to a store; the facade fetches first and computes
/// afterwards, so a fetch never overlaps with a computation.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait CategoryStore: Send + Sync {
    /// Human-readable name of this store (for logs/errors).
    fn name(&self) -> &str;

    /// Active categories owned by `user_id`, by ascending sort order.
    async fn fetch_categories(&self, user_id: Uuid) -> Result<Vec<Category>, CoreError>;
}

/// Source of a user's recorded transactions.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TransactionStore: Send + Sync {
    fn name(&self) -> &str;

    /// Transactions owned by `user_id`. Order is not significant; the
    /// engines derive their own.
    async fn fetch_transactions(&self, user_id: Uuid) -> Result<Vec<Transaction>, CoreError>;
}
