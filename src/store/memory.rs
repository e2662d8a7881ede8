//! In-memory expense store
//!
//! Same semantics as the Postgres store, backed by a shared map. Used by the
//! test suite and handy for running the API without a database.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ExpenseStore, StoreError};
use crate::domain::{Expense, ExpenseChanges, ExpenseFilter, NewExpense};

#[derive(Debug, Clone, Default)]
pub struct MemoryExpenseStore {
    expenses: Arc<RwLock<HashMap<Uuid, Expense>>>,
}

impl MemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored expenses across all owners
    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.expenses.read().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn is_empty(&self) -> bool {
        self.expenses.read().await.is_empty()
    }
}

impl ExpenseStore for MemoryExpenseStore {
    async fn insert(&self, owner: Uuid, expense: NewExpense) -> Result<Expense, StoreError> {
        let now = Utc::now();
        let expense = Expense {
            id: Uuid::new_v4(),
            owner,
            amount: expense.amount,
            category: expense.category,
            date: expense.date,
            note: expense.note,
            created_at: now,
            updated_at: now,
        };

        self.expenses
            .write()
            .await
            .insert(expense.id, expense.clone());

        Ok(expense)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Expense>, StoreError> {
        Ok(self.expenses.read().await.get(&id).cloned())
    }

    async fn find(&self, owner: Uuid, filter: ExpenseFilter) -> Result<Vec<Expense>, StoreError> {
        let mut found: Vec<Expense> = self
            .expenses
            .read()
            .await
            .values()
            .filter(|e| e.owner == owner && filter.matches(e))
            .cloned()
            .collect();

        found.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        Ok(found)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: ExpenseChanges,
    ) -> Result<Option<Expense>, StoreError> {
        let mut expenses = self.expenses.write().await;

        Ok(expenses.get_mut(&id).map(|expense| {
            expense.apply(&changes, Utc::now());
            expense.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.expenses.write().await.remove(&id).is_some())
    }
}
