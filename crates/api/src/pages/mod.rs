//! Server-rendered HTML screens.
//!
//! Pages share the JSON handlers' loading helpers and the repositories.
//! Successful form posts redirect (303) to the affected record. Failed
//! submissions the user can correct re-render the originating page with the
//! message and the matching status; anything else renders `error.html`.

pub mod calendar;
pub mod clients;
pub mod crews;
pub mod forms;
pub mod home;
pub mod invoices;
pub mod jobs;
pub mod members;
pub mod quotes;
pub mod reports;

use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::Router;
use landscaper_core::error::CoreError;
use landscaper_db::error::DbError;
use minijinja::context;

use crate::error::AppError;
use crate::state::AppState;
use crate::views;

/// Error returned by page handlers. Renders `error.html`.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct PageError(pub AppError);

pub type PageResult<T> = Result<T, PageError>;

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        PageError(err)
    }
}

impl From<CoreError> for PageError {
    fn from(err: CoreError) -> Self {
        PageError(err.into())
    }
}

impl From<DbError> for PageError {
    fn from(err: DbError) -> Self {
        PageError(err.into())
    }
}

impl From<sqlx::Error> for PageError {
    fn from(err: sqlx::Error) -> Self {
        PageError(err.into())
    }
}

impl From<minijinja::Error> for PageError {
    fn from(err: minijinja::Error) -> Self {
        PageError(err.into())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, _, message) = self.0.classify();
        error_page(status, &message)
    }
}

fn error_page(status: StatusCode, message: &str) -> Response {
    let title = status.canonical_reason().unwrap_or("Error");
    match views::render(
        "error.html",
        context! { status => status.as_u16(), title => title, message => message },
    ) {
        Ok(page) => (status, page).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Error page failed to render");
            (status, message.to_string()).into_response()
        }
    }
}

/// Split a failed action into the status and message to show on the
/// originating page. Missing records and server faults go to the error page
/// instead.
pub fn recoverable(err: impl Into<AppError>) -> PageResult<(StatusCode, String)> {
    let err = err.into();
    let (status, _, message) = err.classify();
    match status {
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            Ok((status, message))
        }
        _ => Err(PageError(err)),
    }
}

/// Attach a status to a rendered page.
pub fn with_status(status: StatusCode, page: Html<String>) -> Response {
    (status, page).into_response()
}

/// Fallback for unknown paths. API paths get a JSON body.
pub async fn not_found(uri: Uri) -> Response {
    if uri.path().starts_with("/api/") {
        let body = serde_json::json!({
            "error": format!("No route for {}", uri.path()),
            "code": "NOT_FOUND",
        });
        return (StatusCode::NOT_FOUND, axum::Json(body)).into_response();
    }
    error_page(
        StatusCode::NOT_FOUND,
        &format!("No page at {}", uri.path()),
    )
}

/// HTML routes mounted at the root.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(home::router())
        .merge(clients::router())
        .merge(crews::router())
        .merge(members::router())
        .merge(jobs::router())
        .merge(quotes::router())
        .merge(invoices::router())
        .merge(calendar::router())
        .merge(reports::router())
}
