//! Read-only report endpoints.

use axum::extract::{Query, State};
use axum::Json;
use landscaper_core::reporting::{DateRange, MonthlyRevenue, StatusCount};
use landscaper_db::models::report::{DashboardSummary, UnpaidJob};
use landscaper_db::repositories::ReportRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::today;
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Monthly revenue with the range it covers.
#[derive(Debug, Serialize)]
pub struct RevenueReport {
    pub range: DateRange,
    pub months: Vec<MonthlyRevenue>,
    pub total: i64,
}

pub async fn load_revenue(state: &AppState, params: &DateRangeParams) -> AppResult<RevenueReport> {
    let range = params.range(today())?;
    let months = ReportRepo::revenue_by_month(&state.pool, range).await?;
    let total = months.iter().map(|m| m.total).sum();
    Ok(RevenueReport {
        range,
        months,
        total,
    })
}

/// GET /api/v1/reports/revenue?from=&to=
pub async fn revenue(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<Json<DataResponse<RevenueReport>>> {
    let report = load_revenue(&state, &params).await?;
    Ok(Json(DataResponse { data: report }))
}

/// GET /api/v1/reports/jobs-by-status
pub async fn jobs_by_status(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<StatusCount>>>> {
    let counts = ReportRepo::jobs_by_status(&state.pool).await?;
    Ok(Json(DataResponse { data: counts }))
}

/// GET /api/v1/reports/unpaid
pub async fn unpaid_jobs(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UnpaidJob>>>> {
    let jobs = ReportRepo::unpaid_jobs(&state.pool).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /api/v1/reports/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    let summary = ReportRepo::dashboard(&state.pool, today()).await?;
    Ok(Json(DataResponse { data: summary }))
}
