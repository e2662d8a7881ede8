//! Expense Tracker Library
//!
//! Re-exports modules for the server binary and integration testing.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
mod error;
pub mod service;
pub mod store;
pub mod summary;

pub use config::Config;
pub use domain::{
    Amount, Category, DateRange, DomainError, Expense, ExpenseDraft, ExpenseFilter, ExpensePatch,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use service::ExpenseService;
pub use store::{ExpenseStore, MemoryExpenseStore, PgExpenseStore, StoreError};
pub use summary::Summary;
