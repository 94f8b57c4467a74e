//! Month calendar of scheduled jobs.

use axum::extract::{Query, State};
use axum::Json;
use landscaper_core::calendar::{month_view, MonthView};
use landscaper_db::models::job::Job;
use landscaper_db::repositories::JobRepo;

use crate::error::AppResult;
use crate::handlers::today;
use crate::query::CalendarParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Jobs of the requested month laid out on a Monday-first grid.
pub async fn load_month(state: &AppState, params: &CalendarParams) -> AppResult<MonthView<Job>> {
    let today = today();
    let month = params.month(today)?;
    let jobs = JobRepo::list_in_range(&state.pool, month.first_day(), month.last_day()).await?;
    Ok(month_view(month, jobs, |job| job.scheduled_date, today))
}

/// GET /api/v1/calendar?year=&month=
///
/// Out-of-range months roll into the adjacent year.
pub async fn month(
    State(state): State<AppState>,
    Query(params): Query<CalendarParams>,
) -> AppResult<Json<DataResponse<MonthView<Job>>>> {
    let view = load_month(&state, &params).await?;
    Ok(Json(DataResponse { data: view }))
}
