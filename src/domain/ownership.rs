//! Authorization guard
//!
//! An expense is readable and writable only by its owner.

use uuid::Uuid;

use super::error::DomainError;
use super::expense::Expense;

/// Fail with `DomainError::Forbidden` unless `caller` owns `expense`.
///
/// Only applies to single-record operations. Listing and summarizing
/// restrict by owner in the query itself.
pub fn ensure_owner(caller: Uuid, expense: &Expense) -> Result<(), DomainError> {
    if expense.owner == caller {
        Ok(())
    } else {
        tracing::warn!(
            caller = %caller,
            expense_id = %expense.id,
            "Rejected access to another user's expense"
        );
        Err(DomainError::Forbidden)
    }
}
