//! Dashboard at `/`.

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use chrono::Duration;
use landscaper_db::repositories::{JobRepo, ReportRepo};
use minijinja::context;

use crate::handlers::today;
use crate::pages::PageResult;
use crate::state::AppState;
use crate::views;

/// Jobs within this many days show on the dashboard.
const UPCOMING_DAYS: i64 = 14;

async fn dashboard(State(state): State<AppState>) -> PageResult<Html<String>> {
    let today = today();
    let summary = ReportRepo::dashboard(&state.pool, today).await?;
    let upcoming =
        JobRepo::list_in_range(&state.pool, today, today + Duration::days(UPCOMING_DAYS)).await?;
    Ok(views::render(
        "home.html",
        context! { summary, upcoming, today, upcoming_days => UPCOMING_DAYS },
    )?)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}
