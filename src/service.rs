//! Expense Service
//!
//! The operations exposed to the API layer. Every call takes the caller's
//! identity explicitly; ownership is enforced here before any mutation.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    ensure_owner, DateRange, DomainError, Expense, ExpenseDraft, ExpenseFilter, ExpensePatch,
};
use crate::error::AppResult;
use crate::store::ExpenseStore;
use crate::summary::{self, Summary};

/// Expense operations over some [`ExpenseStore`]
#[derive(Debug, Clone)]
pub struct ExpenseService<S> {
    store: S,
}

impl<S: ExpenseStore> ExpenseService<S> {
    /// Create a new ExpenseService
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The caller's expenses matching `filter`, newest first
    pub async fn list(&self, caller: Uuid, filter: ExpenseFilter) -> AppResult<Vec<Expense>> {
        let expenses = self.store.find(caller, filter).await?;

        tracing::debug!(
            caller = %caller,
            category = ?filter.category,
            count = expenses.len(),
            "Listed expenses"
        );

        Ok(expenses)
    }

    /// A single expense owned by the caller
    pub async fn get(&self, caller: Uuid, id: Uuid) -> AppResult<Expense> {
        self.load_owned(caller, id).await
    }

    /// Validate and persist a new expense owned by the caller
    pub async fn create(&self, caller: Uuid, draft: ExpenseDraft) -> AppResult<Expense> {
        let new_expense = draft.validate()?;
        let expense = self.store.insert(caller, new_expense).await?;

        tracing::info!(
            caller = %caller,
            expense_id = %expense.id,
            amount = %expense.amount,
            category = %expense.category,
            "Expense created"
        );

        Ok(expense)
    }

    /// Apply the supplied fields of `patch`. The owner never changes.
    pub async fn update(&self, caller: Uuid, id: Uuid, patch: ExpensePatch) -> AppResult<Expense> {
        let current = self.load_owned(caller, id).await?;
        let changes = patch.validate()?;

        if changes.is_empty() {
            return Ok(current);
        }

        // Deleted between the ownership check and the write
        let expense = self
            .store
            .update(id, changes)
            .await?
            .ok_or_else(|| DomainError::not_found(id))?;

        tracing::info!(caller = %caller, expense_id = %id, "Expense updated");

        Ok(expense)
    }

    pub async fn delete(&self, caller: Uuid, id: Uuid) -> AppResult<()> {
        self.load_owned(caller, id).await?;

        if !self.store.delete(id).await? {
            return Err(DomainError::not_found(id).into());
        }

        tracing::info!(caller = %caller, expense_id = %id, "Expense deleted");

        Ok(())
    }

    /// Spending summary as of now
    pub async fn summarize(&self, caller: Uuid, range: DateRange) -> AppResult<Summary> {
        self.summarize_at(caller, range, Utc::now()).await
    }

    /// Spending summary as of `now`.
    ///
    /// Totals and the category breakdown respect `range`; the monthly
    /// breakdown always covers the trailing window ending at `now`.
    pub async fn summarize_at(
        &self,
        caller: Uuid,
        range: DateRange,
        now: DateTime<Utc>,
    ) -> AppResult<Summary> {
        let in_range = self.store.find(caller, ExpenseFilter::in_range(range)).await?;

        let window = DateRange::since(summary::monthly_window_start(now));
        let recent = self.store.find(caller, ExpenseFilter::in_range(window)).await?;

        let summary = summary::summarize(&in_range, &recent);

        tracing::debug!(
            caller = %caller,
            total = %summary.total_spent,
            count = summary.transaction_count,
            "Summarized expenses"
        );

        Ok(summary)
    }

    /// Existence first, then ownership
    async fn load_owned(&self, caller: Uuid, id: Uuid) -> AppResult<Expense> {
        let expense = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(id))?;

        ensure_owner(caller, &expense)?;

        Ok(expense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use crate::error::AppError;
    use crate::store::MemoryExpenseStore;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn service() -> ExpenseService<MemoryExpenseStore> {
        ExpenseService::new(MemoryExpenseStore::new())
    }

    fn draft(amount: rust_decimal::Decimal, category: &str, date: &str) -> ExpenseDraft {
        ExpenseDraft::new(amount, category, date)
    }

    fn assert_domain_err<T: std::fmt::Debug>(
        result: AppResult<T>,
        expected: fn(&DomainError) -> bool,
    ) {
        match result {
            Err(AppError::Domain(ref err)) if expected(err) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_sets_owner_from_caller() {
        let service = service();
        let caller = Uuid::new_v4();

        let expense = service
            .create(caller, draft(dec!(50.00), "Groceries", "2024-01-10"))
            .await
            .unwrap();

        assert_eq!(expense.owner, caller);
        assert_eq!(expense.note, "");
        assert_eq!(expense.category, Category::Groceries);
    }

    #[tokio::test]
    async fn test_invalid_create_persists_nothing() {
        let store = MemoryExpenseStore::new();
        let service = ExpenseService::new(store.clone());
        let caller = Uuid::new_v4();

        let invalid = [
            draft(dec!(0), "Groceries", "2024-01-10"),
            draft(dec!(-3), "Groceries", "2024-01-10"),
            draft(dec!(3), "Pets", "2024-01-10"),
            ExpenseDraft {
                date: None,
                ..draft(dec!(3), "Groceries", "2024-01-10")
            },
        ];

        for d in invalid {
            assert_domain_err(service.create(caller, d).await, DomainError::is_validation_error);
        }

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_not_found_and_forbidden() {
        let service = service();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let expense = service
            .create(alice, draft(dec!(12), "Travel", "2024-01-10"))
            .await
            .unwrap();

        assert_domain_err(service.get(alice, Uuid::new_v4()).await, |e| {
            matches!(e, DomainError::ExpenseNotFound(_))
        });
        assert_domain_err(service.get(bob, expense.id).await, |e| *e == DomainError::Forbidden);

        // repeated reads are identical
        let first = service.get(alice, expense.id).await.unwrap();
        let second = service.get(alice, expense.id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_update_changes_only_supplied_fields() {
        let service = service();
        let alice = Uuid::new_v4();

        let expense = service
            .create(alice, draft(dec!(12), "Travel", "2024-01-10").with_note("train"))
            .await
            .unwrap();

        let patch: ExpensePatch = serde_json::from_value(serde_json::json!({
            "amount": "15.50",
            "owner": Uuid::new_v4(),
        }))
        .unwrap();

        let updated = service.update(alice, expense.id, patch).await.unwrap();

        assert_eq!(updated.owner, alice);
        assert_eq!(updated.amount.value(), dec!(15.50));
        assert_eq!(updated.category, Category::Travel);
        assert_eq!(updated.note, "train");
        assert_eq!(updated.date, expense.date);
    }

    #[tokio::test]
    async fn test_update_checks_ownership_before_validation() {
        let service = service();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let expense = service
            .create(alice, draft(dec!(12), "Travel", "2024-01-10"))
            .await
            .unwrap();

        let bad_patch = || ExpensePatch {
            category: Some("Pets".to_string()),
            ..Default::default()
        };

        assert_domain_err(service.update(bob, expense.id, bad_patch()).await, |e| {
            *e == DomainError::Forbidden
        });
        assert_domain_err(
            service.update(alice, expense.id, bad_patch()).await,
            DomainError::is_validation_error,
        );
        assert_domain_err(service.update(alice, Uuid::new_v4(), bad_patch()).await, |e| {
            matches!(e, DomainError::ExpenseNotFound(_))
        });

        // rejected patches leave the record alone
        assert_eq!(service.get(alice, expense.id).await.unwrap(), expense);
    }

    #[tokio::test]
    async fn test_delete_by_other_user_is_forbidden() {
        let service = service();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let expense = service
            .create(alice, draft(dec!(9.99), "Shopping", "2024-01-10"))
            .await
            .unwrap();

        assert_domain_err(service.delete(bob, expense.id).await, |e| *e == DomainError::Forbidden);
        assert_eq!(service.list(alice, ExpenseFilter::default()).await.unwrap().len(), 1);

        service.delete(alice, expense.id).await.unwrap();
        assert!(service.list(alice, ExpenseFilter::default()).await.unwrap().is_empty());
        assert_domain_err(service.delete(alice, expense.id).await, |e| {
            matches!(e, DomainError::ExpenseNotFound(_))
        });
    }

    #[tokio::test]
    async fn test_list_never_leaks_other_owners() {
        let service = service();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        service.create(alice, draft(dec!(1), "Other", "2024-01-10")).await.unwrap();
        service.create(bob, draft(dec!(2), "Other", "2024-01-10")).await.unwrap();
        service.create(bob, draft(dec!(3), "Travel", "2024-01-11")).await.unwrap();

        let filters = [
            ExpenseFilter::default(),
            ExpenseFilter::new(Some(Category::Other), DateRange::default()),
            ExpenseFilter::new(Some(Category::Travel), DateRange::default()),
        ];
        for filter in filters {
            let listed = service.list(alice, filter).await.unwrap();
            assert!(listed.iter().all(|e| e.owner == alice));
        }
    }

    #[tokio::test]
    async fn test_summarize_single_groceries_expense() {
        let service = service();
        let user = Uuid::new_v4();

        service
            .create(user, draft(dec!(50.00), "Groceries", "2024-01-10"))
            .await
            .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let summary = service.summarize_at(user, DateRange::default(), now).await.unwrap();

        assert_eq!(summary.total_spent, "50.00");
        assert_eq!(summary.transaction_count, 1);
        assert_eq!(summary.category_breakdown.len(), 1);
        assert_eq!(summary.category_breakdown[0].category, Category::Groceries);
        assert_eq!(summary.category_breakdown[0].total, "50.00");
        assert_eq!(summary.category_breakdown[0].count, 1);
        assert_eq!(summary.monthly_breakdown.len(), 1);
        assert_eq!(summary.monthly_breakdown[0].month, "2024-01");
    }

    #[tokio::test]
    async fn test_summarize_monthly_window_ignores_range() {
        let service = service();
        let user = Uuid::new_v4();
        let now = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();

        // outside the six month window
        service.create(user, draft(dec!(100), "Travel", "2023-12-01")).await.unwrap();
        // inside the window
        service.create(user, draft(dec!(20), "Other", "2024-02-01")).await.unwrap();
        service.create(user, draft(dec!(30), "Other", "2024-07-01")).await.unwrap();

        let range = DateRange::parse(Some("2023-11-01"), Some("2023-12-31")).unwrap();
        let summary = service.summarize_at(user, range, now).await.unwrap();

        assert_eq!(summary.total_spent, "100.00");
        assert_eq!(summary.transaction_count, 1);

        let months: Vec<&str> = summary
            .monthly_breakdown
            .iter()
            .map(|m| m.month.as_str())
            .collect();
        assert_eq!(months, vec!["2024-02", "2024-07"]);
    }
}
