use serde::{Deserialize, Serialize};

/// Upper and lower bounds applied by the input validators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationLimits {
    /// Largest accepted transaction amount (10 billion)
    pub max_amount: i64,
    pub max_category_name_len: usize,
    pub max_description_len: usize,
    pub max_email_len: usize,
    pub min_password_len: usize,
    pub max_password_len: usize,
    /// How far ahead of today a transaction may be dated
    pub max_future_years: u32,
    /// How far behind today a transaction may be dated
    pub max_past_years: u32,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_amount: 10_000_000_000,
            max_category_name_len: 50,
            max_description_len: 200,
            max_email_len: 254,
            min_password_len: 6,
            max_password_len: 128,
            max_future_years: 1,
            max_past_years: 10,
        }
    }
}

/// User-configurable settings, carried inside the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Currency code the presentation layer formats amounts in (e.g. "KRW").
    pub currency: String,

    /// Color given to new categories that don't pick one.
    pub default_category_color: String,

    /// Percentage points a category may drift from its target before it
    /// counts as under- or overweight. Keeps rounding noise from being flagged.
    pub balance_tolerance: f64,

    #[serde(default)]
    pub limits: ValidationLimits,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "KRW".to_string(),
            default_category_color: "#6B7280".to_string(),
            balance_tolerance: 1.0,
            limits: ValidationLimits::default(),
        }
    }
}
