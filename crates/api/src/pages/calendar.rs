//! Month calendar at `/calendar`.

use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use minijinja::context;

use crate::handlers::calendar::load_month;
use crate::pages::PageResult;
use crate::query::CalendarParams;
use crate::state::AppState;
use crate::views;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

async fn month(
    State(state): State<AppState>,
    Query(params): Query<CalendarParams>,
) -> PageResult<Html<String>> {
    let view = load_month(&state, &params).await?;
    Ok(views::render(
        "calendar.html",
        context! { view, weekdays => WEEKDAYS },
    )?)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/calendar", get(month))
}
