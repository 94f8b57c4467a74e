pub mod calendar;
pub mod client;
pub mod crew;
pub mod health;
pub mod invoice;
pub mod job;
pub mod member;
pub mod quote;
pub mod report;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /clients                                  list, create
/// /clients/{id}                             get, update, delete
/// /clients/{id}/jobs                        jobs for client
/// /clients/{id}/quotes                      quotes for client
///
/// /crews                                    list, create
/// /crews/{id}                               get, update, delete
/// /crews/{id}/members                       list, add member
/// /crews/{id}/members/{member_id}           remove member
/// /crews/{id}/jobs                          jobs assigned to crew
///
/// /members                                  list, create
/// /members/{id}                             get, update, delete
/// /members/{id}/crews                       crews the member belongs to
/// /members/{id}/jobs                        jobs the member is assigned to
///
/// /jobs                                     list (?status=), create
/// /jobs/{id}                                get, update, delete
/// /jobs/{id}/members                        assigned members
/// /jobs/{id}/start                          start (POST)
/// /jobs/{id}/complete                       complete with actuals (POST)
/// /jobs/{id}/cancel                         cancel (POST)
/// /jobs/{id}/on-my-way                      record "on my way" notice (POST)
/// /jobs/{id}/invoice                        get, create invoice
/// /jobs/{id}/tasks                          list, create
/// /jobs/{id}/tasks/{task_id}                delete
/// /jobs/{id}/tasks/{task_id}/toggle         toggle completion (POST)
///
/// /quotes                                   list (?status=), create
/// /quotes/{id}                              get, update, delete
/// /quotes/{id}/items                        list, add line item
/// /quotes/{id}/items/{item_id}              delete line item
/// /quotes/{id}/send                         send (POST)
/// /quotes/{id}/accept                       accept, creating a job (POST)
/// /quotes/{id}/decline                      decline (POST)
///
/// /invoices                                 list (?status=)
/// /invoices/{id}                            get, delete
/// /invoices/{id}/send                       mark sent (POST)
/// /invoices/{id}/payments                   list, record payment
/// /invoices/{id}/payments/{payment_id}      delete payment
/// /invoices/{id}/pdf                        PDF export
///
/// /calendar                                 month grid (?year=&month=)
///
/// /reports/dashboard                        summary counts and totals
/// /reports/revenue                          revenue per month (?from=&to=)
/// /reports/jobs-by-status                   job counts per status
/// /reports/unpaid                           jobs with unpaid invoices
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/clients", client::router())
        .nest("/crews", crew::router())
        .nest("/members", member::router())
        .nest("/jobs", job::router())
        .nest("/quotes", quote::router())
        .nest("/invoices", invoice::router())
        .nest("/reports", report::router())
        .merge(calendar::router())
}
