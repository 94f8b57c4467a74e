//! Reports screen: revenue by month, jobs by status and unpaid work.

use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use landscaper_db::repositories::ReportRepo;
use minijinja::context;

use crate::handlers::report::load_revenue;
use crate::pages::PageResult;
use crate::query::DateRangeParams;
use crate::state::AppState;
use crate::views;

async fn reports(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> PageResult<Html<String>> {
    let revenue = load_revenue(&state, &params).await?;
    let statuses = ReportRepo::jobs_by_status(&state.pool).await?;
    let unpaid = ReportRepo::unpaid_jobs(&state.pool).await?;
    let outstanding: i64 = unpaid.iter().map(|u| u.balance).sum();
    Ok(views::render(
        "reports.html",
        context! { revenue, statuses, unpaid, outstanding },
    )?)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/reports", get(reports))
}
