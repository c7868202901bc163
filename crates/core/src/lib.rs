pub mod errors;
pub mod models;
pub mod services;
pub mod stores;

use chrono::{Local, NaiveDate};
use models::{
    allocation::{AllocationStatus, PortfolioAllocation, PortfolioSummary, RebalanceSuggestion},
    category::{Category, CategoryInput, CategoryPatch, CategoryType},
    ledger::Ledger,
    settings::Settings,
    summary::{CategorySummary, MonthlySummary, SavingSummary},
    transaction::{Transaction, TransactionInput, TransactionPatch, TransactionSortOrder},
};
use services::{
    allocation_service::AllocationService, category_service::CategoryService,
    summary_service::SummaryService, transaction_service::TransactionService,
    validation_service::ValidationService,
};
use stores::traits::{CategoryStore, TransactionStore};
use tracing::info;
use uuid::Uuid;

use errors::CoreError;

/// Main entry point for the savings-portfolio core library.
///
/// Owns one user's ledger and the services that operate on it. Every
/// summary and allocation is recomputed from the ledger on each call;
/// nothing derived is cached.
#[must_use]
pub struct SavingsTracker {
    ledger: Ledger,
    category_service: CategoryService,
    transaction_service: TransactionService,
    summary_service: SummaryService,
    allocation_service: AllocationService,
    /// Tracks whether any mutation has occurred since the last sync/save.
    dirty: bool,
}

impl std::fmt::Debug for SavingsTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SavingsTracker")
            .field("user_id", &self.ledger.user_id)
            .field("categories", &self.ledger.categories.len())
            .field("transactions", &self.ledger.transactions.len())
            .field("settings", &self.ledger.settings)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl SavingsTracker {
    /// Empty ledger for `user_id` with default settings.
    pub fn create_new(user_id: Uuid) -> Self {
        Self::build(Ledger::new(user_id))
    }

    /// Empty ledger for `user_id` with the given settings.
    pub fn with_settings(user_id: Uuid, settings: Settings) -> Self {
        let mut ledger = Ledger::new(user_id);
        ledger.settings = settings;
        Self::build(ledger)
    }

    /// Wrap an existing ledger (e.g. one restored by the caller).
    pub fn from_ledger(ledger: Ledger) -> Self {
        Self::build(ledger)
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.ledger.user_id
    }

    // ── Store Sync ──────────────────────────────────────────────────

    /// Replace the in-memory collections with a fresh fetch from the stores.
    ///
    /// Both fetches complete before anything is replaced; if either fails
    /// the ledger is left as it was. Stores only serve active categories,
    /// so soft-deleted ones already in the ledger are kept.
    pub async fn sync_from_stores(
        &mut self,
        category_store: &dyn CategoryStore,
        transaction_store: &dyn TransactionStore,
    ) -> Result<(), CoreError> {
        let user_id = self.ledger.user_id;
        let categories = category_store.fetch_categories(user_id).await?;
        let transactions = transaction_store.fetch_transactions(user_id).await?;

        info!(
            category_store = category_store.name(),
            transaction_store = transaction_store.name(),
            categories = categories.len(),
            transactions = transactions.len(),
            "synced ledger from stores"
        );

        let mut merged = categories;
        let inactive: Vec<Category> = self
            .ledger
            .categories
            .iter()
            .filter(|c| !c.is_active && merged.iter().all(|m| m.id != c.id))
            .cloned()
            .collect();
        merged.extend(inactive);

        self.ledger.categories = merged;
        self.ledger.transactions = transactions;
        self.dirty = false;
        Ok(())
    }

    // ── Category Management ─────────────────────────────────────────

    /// Validate and add a category. Returns the new category id.
    pub fn add_category(&mut self, input: CategoryInput) -> Result<i64, CoreError> {
        let id = self.category_service.create(&mut self.ledger, input)?;
        self.dirty = true;
        Ok(id)
    }

    /// Partially update an active category.
    pub fn update_category(&mut self, id: i64, patch: CategoryPatch) -> Result<(), CoreError> {
        self.category_service.update(&mut self.ledger, id, patch)?;
        self.dirty = true;
        Ok(())
    }

    /// Soft-delete a category. Its transactions keep counting toward totals.
    pub fn delete_category(&mut self, id: i64) -> Result<(), CoreError> {
        self.category_service.soft_delete(&mut self.ledger, id)?;
        self.dirty = true;
        Ok(())
    }

    /// Give a new user the starter categories. Returns how many were added;
    /// 0 when the user already has categories.
    pub fn seed_default_categories(&mut self) -> usize {
        let added = self.category_service.seed_defaults(&mut self.ledger);
        if added > 0 {
            self.dirty = true;
        }
        added
    }

    /// Active categories by sort order.
    #[must_use]
    pub fn categories(&self) -> Vec<&Category> {
        self.category_service.active(&self.ledger)
    }

    #[must_use]
    pub fn categories_by_type(&self, category_type: CategoryType) -> Vec<&Category> {
        self.category_service.by_type(&self.ledger, category_type)
    }

    #[must_use]
    pub fn investment_categories(&self) -> Vec<&Category> {
        self.categories_by_type(CategoryType::Investment)
    }

    #[must_use]
    pub fn savings_categories(&self) -> Vec<&Category> {
        self.categories_by_type(CategoryType::Savings)
    }

    /// Any category by id, soft-deleted ones included.
    #[must_use]
    pub fn get_category(&self, id: i64) -> Option<&Category> {
        self.category_service.by_id(&self.ledger, id)
    }

    // ── Transaction Management ──────────────────────────────────────

    /// Validate and record a transaction dated relative to the local date.
    pub fn add_transaction(&mut self, input: TransactionInput) -> Result<i64, CoreError> {
        self.add_transaction_at(input, today())
    }

    /// Validate and record a transaction, treating `today` as the current date.
    pub fn add_transaction_at(
        &mut self,
        input: TransactionInput,
        today: NaiveDate,
    ) -> Result<i64, CoreError> {
        let id = self.transaction_service.add(&mut self.ledger, input, today)?;
        self.dirty = true;
        Ok(id)
    }

    pub fn update_transaction(&mut self, id: i64, patch: TransactionPatch) -> Result<(), CoreError> {
        self.update_transaction_at(id, patch, today())
    }

    pub fn update_transaction_at(
        &mut self,
        id: i64,
        patch: TransactionPatch,
        today: NaiveDate,
    ) -> Result<(), CoreError> {
        self.transaction_service
            .update(&mut self.ledger, id, patch, today)?;
        self.dirty = true;
        Ok(())
    }

    /// Remove a transaction and return it.
    pub fn remove_transaction(&mut self, id: i64) -> Result<Transaction, CoreError> {
        let removed = self.transaction_service.remove(&mut self.ledger, id)?;
        self.dirty = true;
        Ok(removed)
    }

    #[must_use]
    pub fn get_transaction(&self, id: i64) -> Option<&Transaction> {
        self.ledger.transactions.iter().find(|t| t.id == id)
    }

    /// All transactions, newest first.
    #[must_use]
    pub fn transactions(&self) -> Vec<&Transaction> {
        self.transactions_sorted(TransactionSortOrder::DateDesc)
    }

    #[must_use]
    pub fn transactions_sorted(&self, order: TransactionSortOrder) -> Vec<&Transaction> {
        self.transaction_service.list(&self.ledger, order)
    }

    /// Transactions recorded against active categories of one type.
    #[must_use]
    pub fn transactions_by_type(&self, category_type: CategoryType) -> Vec<Transaction> {
        self.transaction_service.by_type(&self.ledger, category_type)
    }

    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.ledger.transactions.len()
    }

    // ── Summaries ───────────────────────────────────────────────────

    /// Every transaction against every active category.
    #[must_use]
    pub fn total_summary(&self) -> SavingSummary {
        let categories = owned(self.categories());
        self.summary_service
            .build_summary(&self.ledger.transactions, &categories)
    }

    /// Savings-type transactions against savings categories.
    #[must_use]
    pub fn savings_summary(&self) -> SavingSummary {
        self.summary_for(CategoryType::Savings)
    }

    /// Investment-type transactions against investment categories.
    #[must_use]
    pub fn investment_summary(&self) -> SavingSummary {
        self.summary_for(CategoryType::Investment)
    }

    /// This month's savings bucket (empty when nothing was saved yet).
    #[must_use]
    pub fn current_month_summary(&self) -> MonthlySummary {
        self.current_month_summary_at(today())
    }

    #[must_use]
    pub fn current_month_summary_at(&self, today: NaiveDate) -> MonthlySummary {
        self.summary_service
            .current_month_summary(&self.savings_summary(), today)
    }

    /// Savings categories that hold money, for category charts.
    #[must_use]
    pub fn category_breakdown(&self) -> Vec<CategorySummary> {
        self.savings_summary()
            .non_empty_categories()
            .into_iter()
            .cloned()
            .collect()
    }

    // ── Portfolio ───────────────────────────────────────────────────

    /// Current vs. target allocation of the investment pool.
    /// Savings-type deposits never enter the pool.
    #[must_use]
    pub fn portfolio_summary(&self) -> PortfolioSummary {
        let categories = owned(self.investment_categories());
        let transactions = self.transactions_by_type(CategoryType::Investment);
        self.allocation_service
            .compute_allocations(&categories, &transactions)
    }

    /// Suggested per-category split of a new deposit of `additional_amount`.
    /// See [`AllocationService::rebalance`] for why the parts need not sum up.
    #[must_use]
    pub fn rebalance(&self, additional_amount: i64) -> Vec<RebalanceSuggestion> {
        self.allocation_service
            .rebalance(&self.portfolio_summary(), additional_amount)
    }

    /// Allocations with the most underweight first.
    #[must_use]
    pub fn allocations_by_difference(&self) -> Vec<PortfolioAllocation> {
        let summary = self.portfolio_summary();
        self.allocation_service
            .by_difference(&summary)
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn underweight_allocations(&self) -> Vec<PortfolioAllocation> {
        self.allocations_with_status(AllocationStatus::Underweight)
    }

    #[must_use]
    pub fn overweight_allocations(&self) -> Vec<PortfolioAllocation> {
        self.allocations_with_status(AllocationStatus::Overweight)
    }

    /// Sum of investment targets; 100 when the plan is complete.
    #[must_use]
    pub fn total_target_percent(&self) -> f64 {
        let categories = owned(self.investment_categories());
        self.allocation_service.total_target_percent(&categories)
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.ledger.settings
    }

    /// Set the display currency. Must be exactly 3 ASCII letters.
    pub fn set_currency(&mut self, currency: &str) -> Result<(), CoreError> {
        let trimmed = currency.trim().to_uppercase();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::InvalidSetting(format!(
                "currency code '{currency}' must be exactly 3 ASCII letters (e.g. KRW, USD)"
            )));
        }
        self.ledger.settings.currency = trimmed;
        self.dirty = true;
        Ok(())
    }

    /// Set the under/overweight tolerance in percentage points.
    pub fn set_balance_tolerance(&mut self, tolerance: f64) -> Result<(), CoreError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(CoreError::InvalidSetting(format!(
                "balance tolerance {tolerance} must be a non-negative number"
            )));
        }
        self.ledger.settings.balance_tolerance = tolerance;
        self.dirty = true;
        Ok(())
    }

    /// A validator configured with this ledger's limits, for form checks
    /// that happen before anything is submitted.
    #[must_use]
    pub fn validator(&self) -> ValidationService {
        ValidationService::with_limits(self.ledger.settings.limits.clone())
    }

    // ── Dirty State ─────────────────────────────────────────────────

    /// Returns `true` if the ledger changed since the last sync or save.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Called by the caller once it has written the ledger to its store.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// The full ledger as pretty JSON.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.ledger)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger: {e}")))
    }

    /// Rebuild a tracker from JSON produced by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let ledger: Ledger = serde_json::from_str(json)?;
        Ok(Self::build(ledger))
    }

    /// Transactions only, newest first, as pretty JSON.
    pub fn export_transactions_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.transactions())
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize transactions: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    fn summary_for(&self, category_type: CategoryType) -> SavingSummary {
        let categories = owned(self.categories_by_type(category_type));
        let transactions = self.transactions_by_type(category_type);
        self.summary_service
            .build_summary(&transactions, &categories)
    }

    fn allocations_with_status(&self, status: AllocationStatus) -> Vec<PortfolioAllocation> {
        let summary = self.portfolio_summary();
        self.allocation_service
            .with_status(&summary, status, self.ledger.settings.balance_tolerance)
            .into_iter()
            .cloned()
            .collect()
    }

    fn build(ledger: Ledger) -> Self {
        Self {
            ledger,
            category_service: CategoryService::new(),
            transaction_service: TransactionService::new(),
            summary_service: SummaryService::new(),
            allocation_service: AllocationService::new(),
            dirty: false,
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn owned(categories: Vec<&Category>) -> Vec<Category> {
    categories.into_iter().cloned().collect()
}
