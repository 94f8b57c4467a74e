//! Route definitions for the `/invoices` resource.
//!
//! Invoices are created through `/jobs/{id}/invoice` or by completing a job.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::invoice;
use crate::state::AppState;

/// Routes mounted at `/invoices`.
///
/// ```text
/// GET    /                              -> list
/// GET    /{id}                          -> get_by_id
/// DELETE /{id}                          -> delete
/// POST   /{id}/send                     -> mark_sent
/// GET    /{id}/payments                 -> list_payments
/// POST   /{id}/payments                 -> record_payment
/// DELETE /{id}/payments/{payment_id}    -> delete_payment
/// GET    /{id}/pdf                      -> export_pdf
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(invoice::list))
        .route("/{id}", get(invoice::get_by_id).delete(invoice::delete))
        .route("/{id}/send", post(invoice::mark_sent))
        .route(
            "/{id}/payments",
            get(invoice::list_payments).post(invoice::record_payment),
        )
        .route(
            "/{id}/payments/{payment_id}",
            delete(invoice::delete_payment),
        )
        .route("/{id}/pdf", get(invoice::export_pdf))
}
