use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use savings_portfolio_core::errors::CoreError;
use savings_portfolio_core::models::category::{Category, CategoryInput, CategoryType};
use savings_portfolio_core::models::transaction::Transaction;
use savings_portfolio_core::stores::memory::InMemoryStore;
use savings_portfolio_core::stores::traits::{CategoryStore, TransactionStore};
use savings_portfolio_core::SavingsTracker;
use uuid::Uuid;

fn make_category(id: i64, user_id: Uuid, sort_order: i64, is_active: bool) -> Category {
    Category {
        id,
        user_id,
        name: format!("category {id}"),
        category_type: CategoryType::Investment,
        target_percent: 50.0,
        color: "#3B82F6".into(),
        sort_order,
        is_active,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn make_tx(id: i64, user_id: Uuid, category_id: i64, amount: i64, date: (i32, u32, u32)) -> Transaction {
    Transaction {
        id,
        user_id,
        category_id,
        amount,
        transaction_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        description: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

// ═══════════════════════════════════════════════════════════════════
// Failing store (simulates an unreachable backend)
// ═══════════════════════════════════════════════════════════════════

struct FailingStore;

#[async_trait]
impl CategoryStore for FailingStore {
    fn name(&self) -> &str {
        "Failing"
    }

    async fn fetch_categories(&self, _user_id: Uuid) -> Result<Vec<Category>, CoreError> {
        Err(CoreError::Store {
            store: "Failing".into(),
            message: "connection refused".into(),
        })
    }
}

#[async_trait]
impl TransactionStore for FailingStore {
    fn name(&self) -> &str {
        "Failing"
    }

    async fn fetch_transactions(&self, _user_id: Uuid) -> Result<Vec<Transaction>, CoreError> {
        Err(CoreError::Store {
            store: "Failing".into(),
            message: "connection refused".into(),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════
// InMemoryStore
// ═══════════════════════════════════════════════════════════════════

mod in_memory_store {
    use super::*;

    #[tokio::test]
    async fn categories_are_scoped_active_and_sorted() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let store = InMemoryStore::with_data(
            vec![
                make_category(1, me, 3, true),
                make_category(2, me, 1, true),
                make_category(3, me, 0, false),
                make_category(4, other, 0, true),
            ],
            Vec::new(),
        );

        let categories = store.fetch_categories(me).await.unwrap();
        let ids: Vec<i64> = categories.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn transactions_are_scoped_and_newest_first() {
        let me = Uuid::new_v4();
        let mut store = InMemoryStore::new();
        store.push_transaction(make_tx(1, me, 1, 100, (2024, 1, 10)));
        store.push_transaction(make_tx(2, me, 1, 200, (2024, 3, 10)));
        store.push_transaction(make_tx(3, Uuid::new_v4(), 1, 999, (2024, 2, 10)));

        let transactions = store.fetch_transactions(me).await.unwrap();
        let ids: Vec<i64> = transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn unknown_user_gets_nothing() {
        let mut store = InMemoryStore::new();
        store.push_category(make_category(1, Uuid::new_v4(), 0, true));
        assert!(store.fetch_categories(Uuid::new_v4()).await.unwrap().is_empty());
        assert!(store.fetch_transactions(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[test]
    fn name() {
        assert_eq!(CategoryStore::name(&InMemoryStore::new()), "InMemory");
    }
}

// ═══════════════════════════════════════════════════════════════════
// SavingsTracker::sync_from_stores
// ═══════════════════════════════════════════════════════════════════

mod sync {
    use super::*;

    #[tokio::test]
    async fn sync_replaces_ledger_and_clears_dirty() {
        let me = Uuid::new_v4();
        let store = InMemoryStore::with_data(
            vec![make_category(1, me, 0, true), make_category(2, me, 1, true)],
            vec![
                make_tx(1, me, 1, 800_000, (2024, 1, 10)),
                make_tx(2, me, 2, 200_000, (2024, 1, 11)),
            ],
        );

        let mut tracker = SavingsTracker::create_new(me);
        tracker
            .add_category(CategoryInput::new("local", CategoryType::Savings))
            .unwrap();
        assert!(tracker.has_unsaved_changes());

        tracker.sync_from_stores(&store, &store).await.unwrap();

        assert!(!tracker.has_unsaved_changes());
        assert_eq!(tracker.categories().len(), 2);
        assert_eq!(tracker.transaction_count(), 2);

        let portfolio = tracker.portfolio_summary();
        assert_eq!(portfolio.total_investment, 1_000_000);
        assert_eq!(portfolio.allocations[0].difference, 30.0);
        assert_eq!(portfolio.allocations[1].difference, -30.0);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_ledger_untouched() {
        let me = Uuid::new_v4();
        let mut tracker = SavingsTracker::create_new(me);
        tracker.seed_default_categories();
        let before = tracker.ledger().clone();

        let store = InMemoryStore::new();
        let err = tracker
            .sync_from_stores(&store, &FailingStore)
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Store { ref store, .. } if store == "Failing"));
        assert_eq!(tracker.ledger(), &before);
        assert!(tracker.has_unsaved_changes());
    }

    #[tokio::test]
    async fn failed_category_fetch_is_reported() {
        let mut tracker = SavingsTracker::create_new(Uuid::new_v4());
        let store = InMemoryStore::new();
        let err = tracker
            .sync_from_stores(&FailingStore, &store)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Store error (Failing): connection refused");
    }

    #[tokio::test]
    async fn new_category_never_takes_a_deleted_categorys_id() {
        let me = Uuid::new_v4();
        let store = InMemoryStore::with_data(
            vec![make_category(1, me, 0, true), make_category(2, me, 1, false)],
            vec![make_tx(1, me, 2, 500_000, (2024, 1, 10))],
        );

        let mut tracker = SavingsTracker::create_new(me);
        tracker.sync_from_stores(&store, &store).await.unwrap();

        let id = tracker
            .add_category(
                CategoryInput::new("new fund", CategoryType::Investment).with_target_percent(10.0),
            )
            .unwrap();
        assert_eq!(id, 3);

        let portfolio = tracker.portfolio_summary();
        assert_eq!(portfolio.total_investment, 0);
        assert!(portfolio.allocations.iter().all(|a| a.current_amount == 0));
        assert_eq!(tracker.total_summary().total, 500_000);
    }

    #[tokio::test]
    async fn sync_keeps_soft_deleted_categories_already_in_the_ledger() {
        let me = Uuid::new_v4();
        let mut tracker = SavingsTracker::create_new(me);
        tracker.seed_default_categories();
        let removed = tracker.investment_categories()[0].id;
        tracker.delete_category(removed).unwrap();

        let active: Vec<Category> = tracker.categories().into_iter().cloned().collect();
        let store = InMemoryStore::with_data(active, Vec::new());
        tracker.sync_from_stores(&store, &store).await.unwrap();

        let kept = tracker.get_category(removed).unwrap();
        assert!(!kept.is_active);
        assert_eq!(tracker.categories().len(), 7);
        assert_eq!(tracker.ledger().categories.len(), 8);
    }
}
