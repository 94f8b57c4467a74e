//! Route definitions for the `/members` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::member;
use crate::state::AppState;

/// Routes mounted at `/members`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// GET    /{id}/crews    -> list_crews
/// GET    /{id}/jobs     -> list_jobs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(member::list).post(member::create))
        .route(
            "/{id}",
            get(member::get_by_id)
                .put(member::update)
                .delete(member::delete),
        )
        .route("/{id}/crews", get(member::list_crews))
        .route("/{id}/jobs", get(member::list_jobs))
}
