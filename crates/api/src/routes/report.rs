//! Route definitions for `/reports`.

use axum::routing::get;
use axum::Router;

use crate::handlers::report;
use crate::state::AppState;

/// Routes mounted at `/reports`. All read-only.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(report::dashboard))
        .route("/revenue", get(report::revenue))
        .route("/jobs-by-status", get(report::jobs_by_status))
        .route("/unpaid", get(report::unpaid_jobs))
}
