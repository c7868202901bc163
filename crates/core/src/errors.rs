use thiserror::Error;

use crate::models::validation::ValidationReport;

/// Unified error type for the entire savings-portfolio-core library.
///
/// The summary and allocation engines never fail; only ledger mutations,
/// snapshot (de)serialization and store access return `CoreError`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input ───────────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(ValidationReport),

    // ── Ledger ──────────────────────────────────────────────────────
    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    #[error("Category {0} has been deleted")]
    CategoryInactive(i64),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(i64),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    // ── Snapshots ───────────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── External stores ─────────────────────────────────────────────
    #[error("Store error ({store}): {message}")]
    Store { store: String, message: String },
}

impl CoreError {
    /// The field errors behind a `Validation` failure, if that is what this is.
    #[must_use]
    pub fn validation_report(&self) -> Option<&ValidationReport> {
        match self {
            CoreError::Validation(report) => Some(report),
            _ => None,
        }
    }
}

impl From<ValidationReport> for CoreError {
    fn from(report: ValidationReport) -> Self {
        CoreError::Validation(report)
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
