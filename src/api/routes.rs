//! API Routes
//!
//! HTTP endpoint definitions for `/api/expenses`.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Category, DateRange, DomainError, Expense, ExpenseDraft, ExpenseFilter, ExpensePatch,
};
use crate::error::AppError;
use crate::service::ExpenseService;
use crate::store::ExpenseStore;
use crate::summary::Summary;

use super::middleware::RequestUser;

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState<S> {
    pub service: ExpenseService<S>,
}

impl<S: ExpenseStore> AppState<S> {
    pub fn new(store: S) -> Self {
        Self {
            service: ExpenseService::new(store),
        }
    }
}

// =========================================================================
// Request/Response types
// =========================================================================

/// `GET /expenses` query string
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseListQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl ExpenseListQuery {
    pub fn into_filter(self) -> Result<ExpenseFilter, DomainError> {
        let category = self
            .category
            .filter(|c| !c.is_empty())
            .map(|c| c.parse::<Category>())
            .transpose()?;
        let range = DateRange::parse(self.start_date.as_deref(), self.end_date.as_deref())?;

        Ok(ExpenseFilter::new(category, range))
    }
}

/// `GET /expenses/summary/stats` query string
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Expense>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the expense router. Expects [`RequestUser`] in request extensions.
pub fn create_router<S: ExpenseStore>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/expenses",
            get(list_expenses::<S>).post(create_expense::<S>),
        )
        // must stay distinct from /expenses/:id
        .route("/expenses/summary/stats", get(get_summary::<S>))
        .route(
            "/expenses/:id",
            get(get_expense::<S>)
                .put(update_expense::<S>)
                .delete(delete_expense::<S>),
        )
}

/// Ids that are not UUIDs cannot exist
fn parse_expense_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| DomainError::not_found(raw).into())
}

// =========================================================================
// GET /expenses
// =========================================================================

async fn list_expenses<S: ExpenseStore>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<RequestUser>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Json<ListResponse>, AppError> {
    let filter = query.into_filter()?;
    let expenses = state.service.list(user.user_id, filter).await?;

    Ok(Json(ListResponse {
        success: true,
        count: expenses.len(),
        data: expenses,
    }))
}

// =========================================================================
// GET /expenses/:id
// =========================================================================

async fn get_expense<S: ExpenseStore>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<RequestUser>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Expense>>, AppError> {
    let id = parse_expense_id(&id)?;
    let expense = state.service.get(user.user_id, id).await?;

    Ok(DataResponse::ok(expense))
}

// =========================================================================
// POST /expenses
// =========================================================================

async fn create_expense<S: ExpenseStore>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<RequestUser>,
    payload: Result<Json<ExpenseDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<Expense>>), AppError> {
    let Json(draft) = payload?;
    let expense = state.service.create(user.user_id, draft).await?;

    Ok((StatusCode::CREATED, DataResponse::ok(expense)))
}

// =========================================================================
// PUT /expenses/:id
// =========================================================================

async fn update_expense<S: ExpenseStore>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<RequestUser>,
    Path(id): Path<String>,
    payload: Result<Json<ExpensePatch>, JsonRejection>,
) -> Result<Json<DataResponse<Expense>>, AppError> {
    let id = parse_expense_id(&id)?;
    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(rejection) => {
            // existence and ownership outrank a malformed body
            state.service.get(user.user_id, id).await?;
            return Err(rejection.into());
        }
    };
    let expense = state.service.update(user.user_id, id, patch).await?;

    Ok(DataResponse::ok(expense))
}

// =========================================================================
// DELETE /expenses/:id
// =========================================================================

async fn delete_expense<S: ExpenseStore>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<RequestUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_expense_id(&id)?;
    state.service.delete(user.user_id, id).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Expense removed".to_string(),
    }))
}

// =========================================================================
// GET /expenses/summary/stats
// =========================================================================

async fn get_summary<S: ExpenseStore>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<RequestUser>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<DataResponse<Summary>>, AppError> {
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())?;
    let summary = state.service.summarize(user.user_id, range).await?;

    Ok(DataResponse::ok(summary))
}
