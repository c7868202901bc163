use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of money a category collects.
///
/// Only investment categories take part in portfolio allocation; savings
/// deposits never count toward portfolio percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Plain savings (salary deposits, installment savings, ...)
    Savings,
    /// Investment bucket with a target portfolio weight
    Investment,
}

impl std::fmt::Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryType::Savings => write!(f, "savings"),
            CategoryType::Investment => write!(f, "investment"),
        }
    }
}

impl std::str::FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "savings" => Ok(CategoryType::Savings),
            "investment" => Ok(CategoryType::Investment),
            other => Err(format!("unknown category type '{other}'")),
        }
    }
}

/// A user-defined bucket that transactions are assigned to.
///
/// Categories are never physically removed: deleting one flips `is_active`
/// to `false` so that historical transactions keep a resolvable reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Store-assigned identifier
    pub id: i64,

    /// Owner of this category
    pub user_id: Uuid,

    /// Display name (at most 50 characters)
    pub name: String,

    /// Savings or investment
    #[serde(rename = "type")]
    pub category_type: CategoryType,

    /// Target portfolio weight in percent, 0..=100.
    /// Only meaningful for investment categories.
    pub target_percent: f64,

    /// Hex color used by charts (e.g. "#4CAF50")
    pub color: String,

    /// Position in user-facing listings (ascending)
    pub sort_order: i64,

    /// `false` once the category has been soft-deleted
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

impl Category {
    /// The target weight that portfolio math should use.
    ///
    /// Savings categories carry no target by convention, whatever value
    /// happens to be stored.
    #[must_use]
    pub fn effective_target_percent(&self) -> f64 {
        match self.category_type {
            CategoryType::Investment => self.target_percent,
            CategoryType::Savings => 0.0,
        }
    }

    #[must_use]
    pub fn is_investment(&self) -> bool {
        self.category_type == CategoryType::Investment
    }
}

/// Fields a user submits when creating a category.
///
/// `category_type` is kept as raw text so that an unknown type can be
/// reported as a field error instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: String,
    #[serde(default)]
    pub target_percent: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>, category_type: CategoryType) -> Self {
        Self {
            name: name.into(),
            category_type: category_type.to_string(),
            ..Self::default()
        }
    }

    pub fn with_target_percent(mut self, percent: f64) -> Self {
        self.target_percent = Some(percent);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = Some(sort_order);
        self
    }
}

/// Partial update of an existing category. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub category_type: Option<CategoryType>,
    #[serde(default)]
    pub target_percent: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i64>,
}
