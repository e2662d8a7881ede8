//! Domain module
//!
//! Core expense types, validation and the ownership rule.

pub mod amount;
pub mod category;
pub mod context;
pub mod error;
pub mod expense;
pub mod ownership;

pub use amount::{Amount, AmountError};
pub use category::{Category, ParseCategoryError};
pub use context::OperationContext;
pub use error::DomainError;
pub use expense::{
    parse_datetime, DateRange, Expense, ExpenseChanges, ExpenseDraft, ExpenseFilter, ExpensePatch,
    NewExpense, NOTE_MAX_CHARS,
};
pub use ownership::ensure_owner;
