use chrono::Utc;
use tracing::{info, warn};

use crate::errors::CoreError;
use crate::models::category::{Category, CategoryInput, CategoryPatch, CategoryType};
use crate::models::ledger::Ledger;
use crate::services::validation_service::ValidationService;

/// Starter categories for a user who has none yet:
/// (name, type, target percent, color).
pub const DEFAULT_CATEGORIES: [(&str, CategoryType, f64, &str); 8] = [
    ("월급", CategoryType::Savings, 0.0, "#4CAF50"),
    ("적금", CategoryType::Savings, 0.0, "#2196F3"),
    ("Core", CategoryType::Investment, 30.0, "#3B82F6"),
    ("AI 전력 인프라", CategoryType::Investment, 6.0, "#10B981"),
    ("AI 소프트웨어", CategoryType::Investment, 6.0, "#8B5CF6"),
    ("구조적 분산", CategoryType::Investment, 6.0, "#F59E0B"),
    ("안전자산", CategoryType::Investment, 6.0, "#6B7280"),
    ("도전", CategoryType::Investment, 6.0, "#EF4444"),
];

/// Creates, updates and soft-deletes categories in a ledger.
pub struct CategoryService;

impl CategoryService {
    pub fn new() -> Self {
        Self
    }

    /// Validate and add a new category. Returns its id.
    ///
    /// Defaults: target 0%, the configured default color, and a sort order
    /// one past the highest among active categories.
    pub fn create(&self, ledger: &mut Ledger, input: CategoryInput) -> Result<i64, CoreError> {
        let validator = ValidationService::with_limits(ledger.settings.limits.clone());
        let report = validator.validate_category_input(&input);

        let category_type = match input.category_type.parse::<CategoryType>() {
            Ok(t) if report.is_valid() => t,
            _ => {
                warn!(errors = %report, "rejected category input");
                return Err(CoreError::Validation(report));
            }
        };

        let sort_order = input.sort_order.unwrap_or_else(|| {
            ledger
                .categories
                .iter()
                .filter(|c| c.is_active)
                .map(|c| c.sort_order)
                .fold(0, i64::max)
                + 1
        });

        let id = ledger.next_category_id();
        let color = input
            .color
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| ledger.settings.default_category_color.clone());

        ledger.categories.push(Category {
            id,
            user_id: ledger.user_id,
            name: input.name.trim().to_string(),
            category_type,
            target_percent: input.target_percent.unwrap_or(0.0),
            color,
            sort_order,
            is_active: true,
            created_at: Utc::now(),
        });

        info!(id, %category_type, sort_order, "created category");
        Ok(id)
    }

    /// Apply a partial update. Soft-deleted categories can't be edited.
    pub fn update(&self, ledger: &mut Ledger, id: i64, patch: CategoryPatch) -> Result<(), CoreError> {
        let validator = ValidationService::with_limits(ledger.settings.limits.clone());
        let report = validator.validate_category_patch(&patch);
        if !report.is_valid() {
            warn!(id, errors = %report, "rejected category update");
            return Err(CoreError::Validation(report));
        }

        let category = Self::find_active_mut(ledger, id)?;
        if let Some(name) = patch.name {
            category.name = name.trim().to_string();
        }
        if let Some(category_type) = patch.category_type {
            category.category_type = category_type;
        }
        if let Some(percent) = patch.target_percent {
            category.target_percent = percent;
        }
        if let Some(color) = patch.color.filter(|c| !c.is_empty()) {
            category.color = color;
        }
        if let Some(sort_order) = patch.sort_order {
            category.sort_order = sort_order;
        }

        info!(id, "updated category");
        Ok(())
    }

    /// Mark a category inactive. It stays in the ledger so existing
    /// transactions still resolve; deleting twice is a no-op.
    pub fn soft_delete(&self, ledger: &mut Ledger, id: i64) -> Result<(), CoreError> {
        let category = ledger
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CoreError::CategoryNotFound(id))?;

        if category.is_active {
            category.is_active = false;
            info!(id, "soft-deleted category");
        }
        Ok(())
    }

    /// Insert [`DEFAULT_CATEGORIES`] when the user has no active category.
    /// Returns how many were inserted (0 when skipped).
    pub fn seed_defaults(&self, ledger: &mut Ledger) -> usize {
        if ledger.categories.iter().any(|c| c.is_active) {
            return 0;
        }

        let now = Utc::now();
        for (index, (name, category_type, target_percent, color)) in
            DEFAULT_CATEGORIES.iter().enumerate()
        {
            let id = ledger.next_category_id();
            ledger.categories.push(Category {
                id,
                user_id: ledger.user_id,
                name: (*name).to_string(),
                category_type: *category_type,
                target_percent: *target_percent,
                color: (*color).to_string(),
                sort_order: index as i64,
                is_active: true,
                created_at: now,
            });
        }

        info!(count = DEFAULT_CATEGORIES.len(), "seeded default categories");
        DEFAULT_CATEGORIES.len()
    }

    /// Active categories by ascending sort order.
    pub fn active<'a>(&self, ledger: &'a Ledger) -> Vec<&'a Category> {
        let mut active: Vec<&Category> = ledger.categories.iter().filter(|c| c.is_active).collect();
        active.sort_by_key(|c| c.sort_order);
        active
    }

    /// Active categories of one type, by ascending sort order.
    pub fn by_type<'a>(&self, ledger: &'a Ledger, category_type: CategoryType) -> Vec<&'a Category> {
        self.active(ledger)
            .into_iter()
            .filter(|c| c.category_type == category_type)
            .collect()
    }

    /// Any category by id, soft-deleted ones included.
    pub fn by_id<'a>(&self, ledger: &'a Ledger, id: i64) -> Option<&'a Category> {
        ledger.categories.iter().find(|c| c.id == id)
    }

    /// Resolve a category that a transaction may be recorded against.
    pub(crate) fn resolve_active(ledger: &Ledger, id: i64) -> Result<&Category, CoreError> {
        let category = ledger
            .categories
            .iter()
            .find(|c| c.id == id && c.user_id == ledger.user_id)
            .ok_or(CoreError::CategoryNotFound(id))?;
        if !category.is_active {
            return Err(CoreError::CategoryInactive(id));
        }
        Ok(category)
    }

    fn find_active_mut(ledger: &mut Ledger, id: i64) -> Result<&mut Category, CoreError> {
        let category = ledger
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CoreError::CategoryNotFound(id))?;
        if !category.is_active {
            return Err(CoreError::CategoryInactive(id));
        }
        Ok(category)
    }
}

impl Default for CategoryService {
    fn default() -> Self {
        Self::new()
    }
}
