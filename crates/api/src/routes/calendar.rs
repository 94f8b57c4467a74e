use axum::routing::get;
use axum::Router;

use crate::handlers::calendar;
use crate::state::AppState;

/// `GET /calendar?year=&month=`
pub fn router() -> Router<AppState> {
    Router::new().route("/calendar", get(calendar::month))
}
