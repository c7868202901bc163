use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single recorded money movement into a category.
///
/// Amounts are whole currency units; there is no fractional part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Store-assigned identifier
    pub id: i64,

    /// Owner of this transaction
    pub user_id: Uuid,

    /// Category this money was put into
    pub category_id: i64,

    /// Amount in whole currency units, 1..=10_000_000_000
    pub amount: i64,

    /// Calendar date of the movement (daily granularity)
    pub transaction_date: NaiveDate,

    /// Optional free-text note (at most 200 characters)
    #[serde(default)]
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Sort order for transaction listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionSortOrder {
    /// Newest date first (default for display)
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

/// Fields a user submits when recording a transaction.
///
/// Everything is optional so that a half-filled form can still be
/// validated and every missing field reported at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    #[serde(default)]
    pub category_id: Option<i64>,
    /// Kept as a float so fractional input can be seen and rejected.
    #[serde(default)]
    pub amount: Option<f64>,
    /// `YYYY-MM-DD`; today's date is used when absent.
    #[serde(default)]
    pub transaction_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TransactionInput {
    pub fn new(category_id: i64, amount: f64) -> Self {
        Self {
            category_id: Some(category_id),
            amount: Some(amount),
            ..Self::default()
        }
    }

    pub fn on(mut self, date: impl Into<String>) -> Self {
        self.transaction_date = Some(date.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update of an existing transaction. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub transaction_date: Option<String>,
    /// `Some(None)` clears the note.
    #[serde(default)]
    pub description: Option<Option<String>>,
}
