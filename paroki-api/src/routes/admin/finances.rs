/// Finance ledger
///
/// ```text
/// GET    /admin/finances?page=&type=income|expense&start=&end=
/// POST   /admin/finances
/// PUT    /admin/finances/{id}
/// DELETE /admin/finances/{id}
/// ```
///
/// The listing carries income, expense and balance totals over the same
/// filter. Amounts are whole rupiah.

use super::{empty_as_none, PER_PAGE};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    forms::blank_to_none,
    view::{Inertia, Page},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use paroki_shared::{
    auth::middleware::AuthContext,
    models::finance::{Finance, FinanceFilter, FinanceInput, FinanceSummary, FinanceType},
    pagination::{PageRequest, Paginated},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default, Deserialize)]
pub struct FinanceQuery {
    pub page: Option<u32>,

    #[serde(rename = "type")]
    pub entry_type: Option<FinanceType>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub start: Option<NaiveDate>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub end: Option<NaiveDate>,
}

impl FinanceQuery {
    pub fn filter(&self) -> ApiResult<FinanceFilter> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(ApiError::validation(
                    "end",
                    "Tanggal akhir harus setelah tanggal awal",
                ));
            }
        }

        Ok(FinanceFilter {
            entry_type: self.entry_type,
            start: self.start,
            end: self.end,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct FinanceRequest {
    #[validate(length(min = 1, max = 255, message = "Judul wajib diisi"))]
    pub title: String,

    pub entry_type: FinanceType,

    #[validate(range(min = 1, message = "Jumlah harus lebih dari 0"))]
    pub amount: i64,

    pub entry_date: NaiveDate,

    #[validate(length(min = 1, max = 100, message = "Kategori wajib diisi"))]
    pub category: String,

    #[validate(length(max = 2000, message = "Catatan maksimal 2000 karakter"))]
    pub notes: Option<String>,
}

impl FinanceRequest {
    fn into_input(self) -> FinanceInput {
        FinanceInput {
            title: self.title.trim().to_string(),
            entry_type: self.entry_type,
            amount: self.amount,
            entry_date: self.entry_date,
            category: self.category.trim().to_string(),
            notes: blank_to_none(self.notes),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryProps {
    pub income: i64,
    pub expense: i64,
    pub balance: i64,
}

impl From<FinanceSummary> for SummaryProps {
    fn from(summary: FinanceSummary) -> Self {
        Self {
            income: summary.income,
            expense: summary.expense,
            balance: summary.balance(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IndexProps {
    pub finances: Paginated<Finance>,
    pub summary: SummaryProps,
}

pub async fn index(
    State(state): State<AppState>,
    inertia: Inertia,
    Query(query): Query<FinanceQuery>,
) -> ApiResult<Page<IndexProps>> {
    let filter = query.filter()?;
    let request = PageRequest::new(query.page, PER_PAGE);

    let rows = Finance::list(&state.db, filter, request.limit(), request.offset()).await?;
    let total = Finance::count(&state.db, filter).await?;
    let summary = Finance::summary(&state.db, filter).await?;

    Ok(inertia.render(
        "Admin/Finances/Index",
        IndexProps {
            finances: Paginated::new(rows, request, total),
            summary: summary.into(),
        },
    ))
}

pub async fn store(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<FinanceRequest>,
) -> ApiResult<(StatusCode, Json<Finance>)> {
    req.validate()?;
    let finance = Finance::create(&state.db, auth.user_id, req.into_input()).await?;

    tracing::info!(
        finance_id = %finance.id,
        entry_type = finance.entry_type.label(),
        amount = finance.amount,
        "Finance entry recorded"
    );

    Ok((StatusCode::CREATED, Json(finance)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FinanceRequest>,
) -> ApiResult<Json<Finance>> {
    req.validate()?;
    let finance = Finance::update(&state.db, id, req.into_input())
        .await?
        .ok_or_else(|| ApiError::not_found("Finance entry"))?;

    tracing::info!(finance_id = %id, "Finance entry updated");
    Ok(Json(finance))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if !Finance::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Finance entry"));
    }

    tracing::info!(finance_id = %id, "Finance entry deleted");
    Ok(StatusCode::NO_CONTENT)
}
