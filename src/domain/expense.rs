//! Expense record and its inputs
//!
//! Raw client input (`ExpenseDraft`, `ExpensePatch`) is turned into validated
//! values (`NewExpense`, `ExpenseChanges`) here, at the boundary, so the
//! store never sees an invalid amount, category or note.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::amount::Amount;
use super::category::Category;
use super::error::DomainError;

/// Longest note accepted, in characters
pub const NOTE_MAX_CHARS: usize = 200;

/// A persisted expense
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub owner: Uuid,
    pub amount: Amount,
    pub category: Category,
    pub date: DateTime<Utc>,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Apply validated changes in place. `owner` is never touched.
    pub fn apply(&mut self, changes: &ExpenseChanges, now: DateTime<Utc>) {
        if let Some(amount) = changes.amount {
            self.amount = amount;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(date) = changes.date {
            self.date = date;
        }
        if let Some(ref note) = changes.note {
            self.note = note.clone();
        }
        self.updated_at = now;
    }
}

// =========================================================================
// Create
// =========================================================================

/// Unvalidated create payload.
///
/// Any `owner`/`user` field sent by a client is ignored during
/// deserialization; ownership always comes from the authenticated caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// A fully validated expense, ready to be persisted for some owner
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub amount: Amount,
    pub category: Category,
    pub date: DateTime<Utc>,
    pub note: String,
}

impl ExpenseDraft {
    pub fn new(amount: Decimal, category: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            amount: Some(amount),
            category: Some(category.into()),
            date: Some(date.into()),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Validate the draft.
    ///
    /// # Errors
    /// `DomainError::Validation` if amount, category or date is missing,
    /// if amount <= 0, if the category is not one of the fixed set, if the
    /// date cannot be parsed, or if the note is too long.
    pub fn validate(self) -> Result<NewExpense, DomainError> {
        let (amount, category, date) = match (
            self.amount,
            non_blank(self.category),
            non_blank(self.date),
        ) {
            (Some(amount), Some(category), Some(date)) => (amount, category, date),
            _ => {
                return Err(DomainError::validation(
                    "Please provide amount, category, and date",
                ))
            }
        };

        let category: Category = category.parse()?;
        let amount = Amount::new(amount)?;
        let date = parse_datetime(&date)?;
        let note = validate_note(self.note.as_deref().unwrap_or_default())?;

        Ok(NewExpense {
            amount,
            category,
            date,
            note,
        })
    }
}

// =========================================================================
// Update
// =========================================================================

/// Unvalidated partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Validated partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseChanges {
    pub amount: Option<Amount>,
    pub category: Option<Category>,
    pub date: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl ExpensePatch {
    /// Validate each supplied field with the same rules as create.
    pub fn validate(self) -> Result<ExpenseChanges, DomainError> {
        let category = self
            .category
            .map(|c| c.parse::<Category>())
            .transpose()?;
        let amount = self.amount.map(Amount::new).transpose()?;
        let date = self.date.as_deref().map(parse_datetime).transpose()?;
        let note = self.note.as_deref().map(validate_note).transpose()?;

        Ok(ExpenseChanges {
            amount,
            category,
            date,
            note,
        })
    }
}

impl ExpenseChanges {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.note.is_none()
    }
}

// =========================================================================
// Queries
// =========================================================================

/// Inclusive date bounds; either side may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Everything from `start` onwards
    pub fn since(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Parse optional query-string bounds. Blank values count as absent.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, DomainError> {
        let parse_bound = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(parse_datetime)
                .transpose()
        };

        Ok(Self {
            start: parse_bound(start)?,
            end: parse_bound(end)?,
        })
    }

    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| *date >= start) && self.end.map_or(true, |end| *date <= end)
    }
}

/// Narrowing applied on top of the owner restriction when listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub category: Option<Category>,
    pub range: DateRange,
}

impl ExpenseFilter {
    pub fn new(category: Option<Category>, range: DateRange) -> Self {
        Self { category, range }
    }

    /// Filter by date only
    pub fn in_range(range: DateRange) -> Self {
        Self {
            category: None,
            range,
        }
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        self.category.map_or(true, |c| c == expense.category) && self.range.contains(&expense.date)
    }
}

// =========================================================================
// Field helpers
// =========================================================================

/// Parse a client supplied date.
///
/// Accepts RFC 3339 (`2024-01-10T08:30:00Z`), a bare date (`2024-01-10`,
/// taken as midnight UTC) or a naive date-time (taken as UTC).
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, DomainError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    Err(DomainError::validation(format!("Invalid date: {value:?}")))
}

fn validate_note(note: &str) -> Result<String, DomainError> {
    let note = note.trim();
    if note.chars().count() > NOTE_MAX_CHARS {
        return Err(DomainError::validation(format!(
            "Note cannot be more than {NOTE_MAX_CHARS} characters"
        )));
    }
    Ok(note.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
