//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

use super::amount::AmountError;
use super::category::ParseCategoryError;

/// Expected, non-fatal failures of an expense operation.
///
/// These are independent of the web/infrastructure layer; the API layer
/// decides how each one is presented.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Missing or invalid input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The referenced expense does not exist
    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),

    /// The expense exists but belongs to another user
    #[error("Not authorized to access this expense")]
    Forbidden,
}

impl DomainError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error for the given id
    pub fn not_found(id: impl ToString) -> Self {
        Self::ExpenseNotFound(id.to_string())
    }

    /// Check if this is a client input error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<AmountError> for DomainError {
    fn from(err: AmountError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ParseCategoryError> for DomainError {
    fn from(err: ParseCategoryError) -> Self {
        Self::Validation(err.to_string())
    }
}
