use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::errors::CoreError;
use crate::models::category::CategoryType;
use crate::models::ledger::Ledger;
use crate::models::transaction::{
    Transaction, TransactionInput, TransactionPatch, TransactionSortOrder,
};
use crate::services::category_service::CategoryService;
use crate::services::validation_service::ValidationService;

/// Records, edits and removes transactions in a ledger.
///
/// Every write is validated first; a rejected write leaves the ledger untouched.
pub struct TransactionService;

impl TransactionService {
    pub fn new() -> Self {
        Self
    }

    /// Validate and record a transaction. Returns its id.
    ///
    /// The category must be an active category of the ledger's user.
    /// A missing date means `today`; a blank description is dropped.
    pub fn add(
        &self,
        ledger: &mut Ledger,
        input: TransactionInput,
        today: NaiveDate,
    ) -> Result<i64, CoreError> {
        let validator = ValidationService::with_limits(ledger.settings.limits.clone());
        let report = validator.validate_transaction_input(&input, today);

        let (Some(category_id), Some(amount)) = (input.category_id, input.amount) else {
            warn!(errors = %report, "rejected transaction input");
            return Err(CoreError::Validation(report));
        };
        if !report.is_valid() {
            warn!(errors = %report, "rejected transaction input");
            return Err(CoreError::Validation(report));
        }

        CategoryService::resolve_active(ledger, category_id)?;

        let transaction_date = match input.transaction_date.as_deref().filter(|d| !d.is_empty()) {
            Some(raw) => validator
                .parse_date_at(raw, today)
                .map_err(|_| CoreError::Validation(report.clone()))?,
            None => today,
        };

        let id = ledger.next_transaction_id();
        ledger.transactions.push(Transaction {
            id,
            user_id: ledger.user_id,
            category_id,
            // validated: a whole number within the configured ceiling
            amount: amount as i64,
            transaction_date,
            description: normalize_description(input.description),
            created_at: Utc::now(),
        });

        info!(id, category_id, amount = amount as i64, %transaction_date, "recorded transaction");
        Ok(id)
    }

    /// Apply a partial update to an existing transaction.
    pub fn update(
        &self,
        ledger: &mut Ledger,
        id: i64,
        patch: TransactionPatch,
        today: NaiveDate,
    ) -> Result<(), CoreError> {
        let validator = ValidationService::with_limits(ledger.settings.limits.clone());
        let report = validator.validate_transaction_patch(&patch, today);
        if !report.is_valid() {
            warn!(id, errors = %report, "rejected transaction update");
            return Err(CoreError::Validation(report));
        }

        if let Some(category_id) = patch.category_id {
            CategoryService::resolve_active(ledger, category_id)?;
        }
        let new_date = match patch.transaction_date.as_deref() {
            Some(raw) => Some(
                validator
                    .parse_date_at(raw, today)
                    .map_err(|_| CoreError::Validation(report.clone()))?,
            ),
            None => None,
        };

        let transaction = ledger
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(CoreError::TransactionNotFound(id))?;

        if let Some(category_id) = patch.category_id {
            transaction.category_id = category_id;
        }
        if let Some(amount) = patch.amount {
            transaction.amount = amount as i64;
        }
        if let Some(date) = new_date {
            transaction.transaction_date = date;
        }
        if let Some(description) = patch.description {
            transaction.description = normalize_description(description);
        }

        info!(id, "updated transaction");
        Ok(())
    }

    /// Remove a transaction for good and return it.
    pub fn remove(&self, ledger: &mut Ledger, id: i64) -> Result<Transaction, CoreError> {
        let idx = ledger
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or(CoreError::TransactionNotFound(id))?;
        let removed = ledger.transactions.remove(idx);
        info!(id, "removed transaction");
        Ok(removed)
    }

    /// All transactions in the requested order.
    pub fn list<'a>(&self, ledger: &'a Ledger, order: TransactionSortOrder) -> Vec<&'a Transaction> {
        let mut transactions: Vec<&Transaction> = ledger.transactions.iter().collect();
        match order {
            TransactionSortOrder::DateDesc => {
                transactions.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date))
            }
            TransactionSortOrder::DateAsc => {
                transactions.sort_by(|a, b| a.transaction_date.cmp(&b.transaction_date))
            }
            TransactionSortOrder::AmountDesc => transactions.sort_by(|a, b| b.amount.cmp(&a.amount)),
            TransactionSortOrder::AmountAsc => transactions.sort_by(|a, b| a.amount.cmp(&b.amount)),
        }
        transactions
    }

    /// Transactions whose category is an active category of `category_type`.
    pub fn by_type(&self, ledger: &Ledger, category_type: CategoryType) -> Vec<Transaction> {
        let ids: Vec<i64> = ledger
            .categories
            .iter()
            .filter(|c| c.is_active && c.category_type == category_type)
            .map(|c| c.id)
            .collect();

        ledger
            .transactions
            .iter()
            .filter(|t| ids.contains(&t.category_id))
            .cloned()
            .collect()
    }
}

impl Default for TransactionService {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
