//! Route definitions for the `/quotes` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::quote;
use crate::state::AppState;

/// Routes mounted at `/quotes`.
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create
/// GET    /{id}                   -> get_by_id
/// PUT    /{id}                   -> update
/// DELETE /{id}                   -> delete
/// GET    /{id}/items             -> list_items
/// POST   /{id}/items             -> add_item
/// DELETE /{id}/items/{item_id}   -> delete_item
/// POST   /{id}/send              -> send
/// POST   /{id}/accept            -> accept
/// POST   /{id}/decline           -> decline
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(quote::list).post(quote::create))
        .route(
            "/{id}",
            get(quote::get_by_id)
                .put(quote::update)
                .delete(quote::delete),
        )
        .route("/{id}/items", get(quote::list_items).post(quote::add_item))
        .route("/{id}/items/{item_id}", delete(quote::delete_item))
        .route("/{id}/send", post(quote::send))
        .route("/{id}/accept", post(quote::accept))
        .route("/{id}/decline", post(quote::decline))
}
