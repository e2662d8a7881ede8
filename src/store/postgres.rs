//! Postgres expense store
//!
//! Expenses live in the `expenses` table (see `migrations/`).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ExpenseStore, StoreError};
use crate::domain::{Amount, Category, Expense, ExpenseChanges, ExpenseFilter, NewExpense};

/// Row shape shared by every query below
type ExpenseRow = (
    Uuid,
    Uuid,
    Decimal,
    String,
    DateTime<Utc>,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
);

const EXPENSE_COLUMNS: &str = "id, owner_id, amount, category, date, note, created_at, updated_at";

/// Repository for expense records
#[derive(Debug, Clone)]
pub struct PgExpenseStore {
    pool: PgPool,
}

impl PgExpenseStore {
    /// Create a new PgExpenseStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_expense(row: ExpenseRow) -> Result<Expense, StoreError> {
    let (id, owner, amount, category, date, note, created_at, updated_at) = row;

    let amount = Amount::new(amount).map_err(|e| StoreError::corrupt(id, e))?;
    let category: Category = category.parse().map_err(|e| StoreError::corrupt(id, e))?;

    Ok(Expense {
        id,
        owner,
        amount,
        category,
        date,
        note,
        created_at,
        updated_at,
    })
}

impl ExpenseStore for PgExpenseStore {
    async fn insert(&self, owner: Uuid, expense: NewExpense) -> Result<Expense, StoreError> {
        let row: ExpenseRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO expenses
                (id, owner_id, amount, category, date, note, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(expense.amount.value())
        .bind(expense.category.as_str())
        .bind(expense.date)
        .bind(&expense.note)
        .fetch_one(&self.pool)
        .await?;

        into_expense(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Expense>, StoreError> {
        let row: Option<ExpenseRow> = sqlx::query_as(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_expense).transpose()
    }

    async fn find(&self, owner: Uuid, filter: ExpenseFilter) -> Result<Vec<Expense>, StoreError> {
        let rows: Vec<ExpenseRow> = sqlx::query_as(&format!(
            r#"
            SELECT {EXPENSE_COLUMNS}
            FROM expenses
            WHERE owner_id = $1
              AND ($2::text IS NULL OR category = $2)
              AND ($3::timestamptz IS NULL OR date >= $3)
              AND ($4::timestamptz IS NULL OR date <= $4)
            ORDER BY date DESC, created_at DESC
            "#
        ))
        .bind(owner)
        .bind(filter.category.map(|c| c.as_str()))
        .bind(filter.range.start)
        .bind(filter.range.end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(into_expense).collect()
    }

    async fn update(
        &self,
        id: Uuid,
        changes: ExpenseChanges,
    ) -> Result<Option<Expense>, StoreError> {
        let row: Option<ExpenseRow> = sqlx::query_as(&format!(
            r#"
            UPDATE expenses
            SET
                amount = COALESCE($2, amount),
                category = COALESCE($3, category),
                date = COALESCE($4, date),
                note = COALESCE($5, note),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.amount.map(|a| a.value()))
        .bind(changes.category.map(|c| c.as_str()))
        .bind(changes.date)
        .bind(changes.note)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_expense).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
