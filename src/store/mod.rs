//! Expense store
//!
//! Persistence boundary for expense records. The service layer only talks
//! to [`ExpenseStore`], so any backend offering these operations will do.

mod error;
pub mod memory;
pub mod postgres;

use std::future::Future;

use uuid::Uuid;

use crate::domain::{Expense, ExpenseChanges, ExpenseFilter, NewExpense};

pub use error::StoreError;
pub use memory::MemoryExpenseStore;
pub use postgres::PgExpenseStore;

/// Create, read, update and delete expense records.
///
/// Implementations hold no per-request state; cloning a store yields a
/// handle to the same underlying data.
pub trait ExpenseStore: Clone + Send + Sync + 'static {
    /// Persist a new expense for `owner`, assigning its id and timestamps.
    fn insert(
        &self,
        owner: Uuid,
        expense: NewExpense,
    ) -> impl Future<Output = Result<Expense, StoreError>> + Send;

    /// Fetch a single expense regardless of owner.
    fn find_by_id(&self, id: Uuid)
        -> impl Future<Output = Result<Option<Expense>, StoreError>> + Send;

    /// All of `owner`'s expenses matching `filter`, newest `date` first
    /// (ties broken by newest `created_at`).
    fn find(
        &self,
        owner: Uuid,
        filter: ExpenseFilter,
    ) -> impl Future<Output = Result<Vec<Expense>, StoreError>> + Send;

    /// Apply `changes` and bump `updated_at`. Returns `None` if the id is gone.
    fn update(
        &self,
        id: Uuid,
        changes: ExpenseChanges,
    ) -> impl Future<Output = Result<Option<Expense>, StoreError>> + Send;

    /// Remove an expense. Returns whether a record was removed.
    fn delete(&self, id: Uuid) -> impl Future<Output = Result<bool, StoreError>> + Send;
}
