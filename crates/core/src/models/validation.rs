use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A form field that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    CategoryId,
    Amount,
    TransactionDate,
    Description,
    Name,
    Type,
    TargetPercent,
    Color,
    Email,
    Password,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Field::CategoryId => "category_id",
            Field::Amount => "amount",
            Field::TransactionDate => "transaction_date",
            Field::Description => "description",
            Field::Name => "name",
            Field::Type => "type",
            Field::TargetPercent => "target_percent",
            Field::Color => "color",
            Field::Email => "email",
            Field::Password => "password",
        };
        f.write_str(name)
    }
}

/// Why a single field value was rejected.
///
/// The variant is the contract; the Display text is the user-facing
/// message and may be reworded freely.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldError {
    #[error("This field is required")]
    Missing,

    #[error("Not a valid number")]
    NotFinite,

    #[error("Amount must be greater than 0")]
    NotPositive,

    #[error("Amount cannot exceed {max}")]
    AmountTooLarge { max: i64 },

    #[error("Amount must be a whole number")]
    Fractional,

    #[error("Percent must be between {min}% and {max}%")]
    PercentOutOfRange { min: u8, max: u8 },

    #[error("This field cannot be empty")]
    Empty,

    #[error("Must be at least {min} characters")]
    TooShort { min: usize },

    #[error("Must be at most {max} characters")]
    TooLong { max: usize },

    #[error("HTML tags are not allowed")]
    ContainsHtml,

    #[error("Date must be in YYYY-MM-DD format")]
    InvalidDateFormat,

    #[error("Not a valid month")]
    InvalidMonth,

    #[error("Not a valid day for this month")]
    InvalidDay,

    #[error("Date is too far in the future")]
    TooFarInFuture,

    #[error("Date is too far in the past")]
    TooFarInPast,

    #[error("Not a valid color code (e.g. #FF0000)")]
    InvalidColor,

    #[error("Not a valid email address")]
    InvalidEmail,

    #[error("Category type must be 'savings' or 'investment'")]
    InvalidCategoryType,
}

/// Result of a single-field check.
pub type FieldResult = Result<(), FieldError>;

/// Every field error found in one form submission.
///
/// Keyed by field in a fixed order so two reports over the same input
/// compare and serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: BTreeMap<Field, FieldError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record the outcome of a field check; `Ok` leaves the report as is.
    pub fn check(&mut self, field: Field, result: FieldResult) {
        if let Err(e) = result {
            self.errors.insert(field, e);
        }
    }

    pub fn insert(&mut self, field: Field, error: FieldError) {
        self.errors.insert(field, error);
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// User-facing messages keyed by field name, for form rendering.
    #[must_use]
    pub fn messages(&self) -> BTreeMap<String, String> {
        self.errors
            .iter()
            .map(|(field, error)| (field.to_string(), error.to_string()))
            .collect()
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|(field, error)| format!("{field}: {error}"))
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}
