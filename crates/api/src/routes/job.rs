//! Route definitions for the `/jobs` resource.
//!
//! Also carries the per-job task checklist under `/jobs/{id}/tasks`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{job, task};
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// GET    /                              -> list
/// POST   /                              -> create
/// GET    /{id}                          -> get_by_id
/// PUT    /{id}                          -> update
/// DELETE /{id}                          -> delete
/// GET    /{id}/members                  -> list_members
/// POST   /{id}/start                    -> start
/// POST   /{id}/complete                 -> complete
/// POST   /{id}/cancel                   -> cancel
/// POST   /{id}/on-my-way                -> notify_on_my_way
/// GET    /{id}/invoice                  -> get_invoice
/// POST   /{id}/invoice                  -> create_invoice
///
/// GET    /{id}/tasks                    -> task::list
/// POST   /{id}/tasks                    -> task::create
/// DELETE /{id}/tasks/{task_id}          -> task::delete
/// POST   /{id}/tasks/{task_id}/toggle   -> task::toggle
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(job::list).post(job::create))
        .route(
            "/{id}",
            get(job::get_by_id).put(job::update).delete(job::delete),
        )
        .route("/{id}/members", get(job::list_members))
        .route("/{id}/start", post(job::start))
        .route("/{id}/complete", post(job::complete))
        .route("/{id}/cancel", post(job::cancel))
        .route("/{id}/on-my-way", post(job::notify_on_my_way))
        .route(
            "/{id}/invoice",
            get(job::get_invoice).post(job::create_invoice),
        )
        .route("/{id}/tasks", get(task::list).post(task::create))
        .route("/{id}/tasks/{task_id}", delete(task::delete))
        .route("/{id}/tasks/{task_id}/toggle", post(task::toggle))
}
