use chrono::{NaiveDate, TimeZone, Utc};
use savings_portfolio_core::models::allocation::{AllocationStatus, PortfolioAllocation};
use savings_portfolio_core::models::category::{Category, CategoryInput, CategoryType};
use savings_portfolio_core::models::ledger::Ledger;
use savings_portfolio_core::models::settings::{Settings, ValidationLimits};
use savings_portfolio_core::models::summary::{
    CategoryAmount, CategorySummary, MonthlySummary, SavingSummary,
};
use savings_portfolio_core::models::transaction::{Transaction, TransactionInput};
use savings_portfolio_core::models::validation::{Field, FieldError, ValidationReport};
use uuid::Uuid;

fn category(id: i64, category_type: CategoryType, target_percent: f64) -> Category {
    Category {
        id,
        user_id: Uuid::nil(),
        name: format!("category {id}"),
        category_type,
        target_percent,
        color: "#3B82F6".into(),
        sort_order: id,
        is_active: true,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

// ═══════════════════════════════════════════════════════════════════
//  CategoryType
// ═══════════════════════════════════════════════════════════════════

mod category_type {
    use super::*;

    #[test]
    fn display_is_lowercase() {
        assert_eq!(CategoryType::Savings.to_string(), "savings");
        assert_eq!(CategoryType::Investment.to_string(), "investment");
    }

    #[test]
    fn parses_known_types() {
        assert_eq!("savings".parse::<CategoryType>(), Ok(CategoryType::Savings));
        assert_eq!("investment".parse::<CategoryType>(), Ok(CategoryType::Investment));
    }

    #[test]
    fn rejects_unknown_or_miscased_types() {
        assert!("invalid".parse::<CategoryType>().is_err());
        assert!("Savings".parse::<CategoryType>().is_err());
        assert!("".parse::<CategoryType>().is_err());
    }

    #[test]
    fn serializes_as_lowercase_string() {
        assert_eq!(serde_json::to_string(&CategoryType::Investment).unwrap(), "\"investment\"");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Category
// ═══════════════════════════════════════════════════════════════════

mod category_model {
    use super::*;

    #[test]
    fn investment_keeps_its_target() {
        let c = category(1, CategoryType::Investment, 30.0);
        assert_eq!(c.effective_target_percent(), 30.0);
        assert!(c.is_investment());
    }

    #[test]
    fn savings_target_counts_as_zero() {
        let c = category(1, CategoryType::Savings, 25.0);
        assert_eq!(c.effective_target_percent(), 0.0);
        assert!(!c.is_investment());
    }

    #[test]
    fn type_field_serializes_as_type() {
        let json = serde_json::to_value(category(1, CategoryType::Savings, 0.0)).unwrap();
        assert_eq!(json["type"], "savings");
        assert!(json.get("category_type").is_none());
    }

    #[test]
    fn input_builder_sets_fields() {
        let input = CategoryInput::new("Core", CategoryType::Investment)
            .with_target_percent(30.0)
            .with_color("#3B82F6")
            .with_sort_order(4);
        assert_eq!(input.name, "Core");
        assert_eq!(input.category_type, "investment");
        assert_eq!(input.target_percent, Some(30.0));
        assert_eq!(input.color.as_deref(), Some("#3B82F6"));
        assert_eq!(input.sort_order, Some(4));
    }

    #[test]
    fn input_accepts_unknown_type_text() {
        let input: CategoryInput =
            serde_json::from_str(r#"{"name":"x","type":"crypto"}"#).unwrap();
        assert_eq!(input.category_type, "crypto");
        assert_eq!(input.target_percent, None);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Transaction
// ═══════════════════════════════════════════════════════════════════

mod transaction_model {
    use super::*;

    #[test]
    fn input_builder_sets_fields() {
        let input = TransactionInput::new(3, 100_000.0)
            .on("2024-01-15")
            .with_description("1월 월급");
        assert_eq!(input.category_id, Some(3));
        assert_eq!(input.amount, Some(100_000.0));
        assert_eq!(input.transaction_date.as_deref(), Some("2024-01-15"));
        assert_eq!(input.description.as_deref(), Some("1월 월급"));
    }

    #[test]
    fn empty_json_input_has_no_fields() {
        let input: TransactionInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input, TransactionInput::default());
    }

    #[test]
    fn non_numeric_amount_is_rejected_at_the_boundary() {
        let parsed: Result<TransactionInput, _> =
            serde_json::from_str(r#"{"category_id":1,"amount":"1000"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn description_defaults_to_none() {
        let json = r#"{
            "id": 1,
            "user_id": "00000000-0000-0000-0000-000000000000",
            "category_id": 2,
            "amount": 5000,
            "transaction_date": "2024-03-01",
            "created_at": "2024-03-01T00:00:00Z"
        }"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.description, None);
        assert_eq!(t.transaction_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Summaries
// ═══════════════════════════════════════════════════════════════════

mod summary_models {
    use super::*;

    fn bucket() -> MonthlySummary {
        MonthlySummary {
            month: "2024-01".into(),
            total: 150_000,
            by_category: vec![
                CategoryAmount { category_id: 1, amount: 100_000 },
                CategoryAmount { category_id: 4, amount: 50_000 },
            ],
        }
    }

    #[test]
    fn empty_bucket_has_zero_total() {
        let m = MonthlySummary::empty("2024-05");
        assert_eq!(m.month, "2024-05");
        assert_eq!(m.total, 0);
        assert!(m.by_category.is_empty());
    }

    #[test]
    fn amount_for_known_category() {
        assert_eq!(bucket().amount_for(4), 50_000);
    }

    #[test]
    fn amount_for_missing_category_is_zero() {
        assert_eq!(bucket().amount_for(2), 0);
    }

    #[test]
    fn month_lookup_falls_back_to_empty() {
        let summary = SavingSummary {
            total: 150_000,
            by_category: Vec::new(),
            by_month: vec![bucket()],
        };
        assert_eq!(summary.month("2024-01").total, 150_000);
        assert_eq!(summary.month("2023-12"), MonthlySummary::empty("2023-12"));
    }

    #[test]
    fn non_empty_categories_skips_zero_totals() {
        let summary = SavingSummary {
            total: 10,
            by_category: vec![
                CategorySummary { category: category(1, CategoryType::Savings, 0.0), total: 10, count: 1 },
                CategorySummary { category: category(2, CategoryType::Savings, 0.0), total: 0, count: 0 },
            ],
            by_month: Vec::new(),
        };
        let non_empty = summary.non_empty_categories();
        assert_eq!(non_empty.len(), 1);
        assert_eq!(non_empty[0].category.id, 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Allocation status
// ═══════════════════════════════════════════════════════════════════

mod allocation_status {
    use super::*;

    fn allocation(difference: f64) -> PortfolioAllocation {
        PortfolioAllocation {
            category: category(1, CategoryType::Investment, 30.0),
            current_amount: 0,
            current_percent: 30.0 + difference,
            target_percent: 30.0,
            difference,
        }
    }

    #[test]
    fn below_tolerance_is_underweight() {
        assert_eq!(allocation(-1.01).status(1.0), AllocationStatus::Underweight);
    }

    #[test]
    fn above_tolerance_is_overweight() {
        assert_eq!(allocation(1.5).status(1.0), AllocationStatus::Overweight);
    }

    #[test]
    fn tolerance_edges_are_balanced() {
        assert_eq!(allocation(-1.0).status(1.0), AllocationStatus::Balanced);
        assert_eq!(allocation(1.0).status(1.0), AllocationStatus::Balanced);
        assert_eq!(allocation(0.0).status(1.0), AllocationStatus::Balanced);
    }

    #[test]
    fn display() {
        assert_eq!(AllocationStatus::Underweight.to_string(), "underweight");
        assert_eq!(AllocationStatus::Balanced.to_string(), "balanced");
        assert_eq!(AllocationStatus::Overweight.to_string(), "overweight");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  ValidationReport
// ═══════════════════════════════════════════════════════════════════

mod validation_report {
    use super::*;

    #[test]
    fn new_report_is_valid() {
        let report = ValidationReport::new();
        assert!(report.is_valid());
        assert!(report.is_empty());
    }

    #[test]
    fn check_records_only_failures() {
        let mut report = ValidationReport::new();
        report.check(Field::Amount, Ok(()));
        report.check(Field::Name, Err(FieldError::Empty));
        assert_eq!(report.len(), 1);
        assert_eq!(report.get(Field::Name), Some(&FieldError::Empty));
        assert_eq!(report.get(Field::Amount), None);
    }

    #[test]
    fn messages_are_keyed_by_field_name() {
        let mut report = ValidationReport::new();
        report.insert(Field::CategoryId, FieldError::Missing);
        report.insert(Field::Amount, FieldError::Fractional);
        let messages = report.messages();
        assert_eq!(messages["category_id"], "This field is required");
        assert_eq!(messages["amount"], "Amount must be a whole number");
    }

    #[test]
    fn display_joins_in_field_order() {
        let mut report = ValidationReport::new();
        report.insert(Field::Description, FieldError::ContainsHtml);
        report.insert(Field::Amount, FieldError::NotPositive);
        assert_eq!(
            report.to_string(),
            "amount: Amount must be greater than 0, description: HTML tags are not allowed"
        );
    }

    #[test]
    fn serializes_error_kind() {
        let mut report = ValidationReport::new();
        report.insert(Field::Amount, FieldError::AmountTooLarge { max: 10 });
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["errors"]["amount"]["kind"], "amount_too_large");
        assert_eq!(json["errors"]["amount"]["max"], 10);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Settings & Ledger
// ═══════════════════════════════════════════════════════════════════

mod settings_and_ledger {
    use super::*;

    #[test]
    fn default_limits() {
        let limits = ValidationLimits::default();
        assert_eq!(limits.max_amount, 10_000_000_000);
        assert_eq!(limits.max_category_name_len, 50);
        assert_eq!(limits.max_description_len, 200);
        assert_eq!(limits.max_email_len, 254);
        assert_eq!((limits.min_password_len, limits.max_password_len), (6, 128));
        assert_eq!((limits.max_future_years, limits.max_past_years), (1, 10));
    }

    #[test]
    fn default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency, "KRW");
        assert_eq!(settings.default_category_color, "#6B7280");
        assert_eq!(settings.balance_tolerance, 1.0);
    }

    #[test]
    fn settings_without_limits_deserialize_with_defaults() {
        let json = r##"{"currency":"USD","default_category_color":"#000","balance_tolerance":2.0}"##;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.limits, ValidationLimits::default());
        assert_eq!(settings.currency, "USD");
    }

    #[test]
    fn next_ids_start_at_one() {
        let ledger = Ledger::new(Uuid::new_v4());
        assert_eq!(ledger.next_category_id(), 1);
        assert_eq!(ledger.next_transaction_id(), 1);
    }

    #[test]
    fn next_category_id_skips_ids_referenced_by_transactions() {
        let mut ledger = Ledger::new(Uuid::nil());
        ledger.categories.push(category(1, CategoryType::Savings, 0.0));
        ledger.transactions.push(Transaction {
            id: 1,
            user_id: Uuid::nil(),
            category_id: 5,
            amount: 100,
            transaction_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            description: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        });
        assert_eq!(ledger.next_category_id(), 6);
    }

    #[test]
    fn next_category_id_follows_highest() {
        let mut ledger = Ledger::new(Uuid::nil());
        ledger.categories.push(category(7, CategoryType::Savings, 0.0));
        ledger.categories.push(category(3, CategoryType::Savings, 0.0));
        assert_eq!(ledger.next_category_id(), 8);
    }
}
