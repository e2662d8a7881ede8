//! Spending summary
//!
//! Filter → group → sum → sort over a caller's expenses. The store hands us
//! already owner-scoped records; everything here is pure.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Months, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Category, Expense};

/// Length of the monthly trend window, counted back from now
pub const MONTHLY_WINDOW_MONTHS: u32 = 6;

/// Aggregate spending figures for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_spent: String,
    pub transaction_count: usize,
    pub category_breakdown: Vec<CategoryTotal>,
    pub monthly_breakdown: Vec<MonthlyTotal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    /// `YYYY-MM`
    pub month: String,
    pub total: String,
    pub count: usize,
}

/// Start of the monthly trend window: the same instant six calendar months ago.
///
/// Falls back to the last day of the month when the day does not exist
/// (e.g. 31 August → 29 February).
pub fn monthly_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(MONTHLY_WINDOW_MONTHS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Build a summary.
///
/// `in_range` are the expenses matching the caller's date range and drive the
/// totals and category breakdown. `recent` are the expenses dated on or after
/// [`monthly_window_start`] and drive the monthly breakdown, regardless of
/// the caller's range.
pub fn summarize(in_range: &[Expense], recent: &[Expense]) -> Summary {
    let total = in_range
        .iter()
        .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount.value()));

    Summary {
        total_spent: format_money(total),
        transaction_count: in_range.len(),
        category_breakdown: category_breakdown(in_range),
        monthly_breakdown: monthly_breakdown(recent),
    }
}

/// Per-category totals, largest first (ties by label)
pub fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut groups: HashMap<Category, (Decimal, usize)> = HashMap::new();
    for expense in expenses {
        let entry = groups.entry(expense.category).or_default();
        entry.0 = entry.0.saturating_add(expense.amount.value());
        entry.1 += 1;
    }

    let mut groups: Vec<(Category, Decimal, usize)> = groups
        .into_iter()
        .map(|(category, (total, count))| (category, total, count))
        .collect();
    groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));

    groups
        .into_iter()
        .map(|(category, total, count)| CategoryTotal {
            category,
            total: format_money(total),
            count,
        })
        .collect()
}

/// Per-month totals in chronological order
pub fn monthly_breakdown(expenses: &[Expense]) -> Vec<MonthlyTotal> {
    let mut groups: BTreeMap<(i32, u32), (Decimal, usize)> = BTreeMap::new();
    for expense in expenses {
        let key = (expense.date.year(), expense.date.month());
        let entry = groups.entry(key).or_default();
        entry.0 = entry.0.saturating_add(expense.amount.value());
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|((year, month), (total, count))| MonthlyTotal {
            month: format!("{year:04}-{month:02}"),
            total: format_money(total),
            count,
        })
        .collect()
}

/// Fixed two-decimal rendering, no currency symbol
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", value)
}
