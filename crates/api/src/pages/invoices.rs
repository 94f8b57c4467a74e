//! Invoice screens: sending, payments and PDF download.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use landscaper_core::error::CoreError;
use landscaper_core::invoice::{InvoiceStatus, PaymentMethod};
use landscaper_core::types::DbId;
use landscaper_db::models::invoice::RecordPayment;
use landscaper_db::repositories::InvoiceRepo;
use minijinja::context;

use crate::error::{AppError, AppResult};
use crate::handlers::invoice::{load_invoice_detail, pdf_response, render_pdf};
use crate::handlers::today;
use crate::pages::forms::FormFields;
use crate::pages::{recoverable, with_status, PageError, PageResult};
use crate::query::StatusFilterParams;
use crate::state::AppState;
use crate::views;

async fn list(
    State(state): State<AppState>,
    Query(params): Query<StatusFilterParams>,
) -> PageResult<Html<String>> {
    let status = params.parse::<InvoiceStatus>()?;
    let invoices = InvoiceRepo::list(&state.pool, status).await?;
    let statuses: Vec<_> = InvoiceStatus::ALL
        .iter()
        .map(|s| (s.as_str(), s.label()))
        .collect();
    Ok(views::render(
        "invoices/list.html",
        context! { invoices, statuses, selected => status.map(InvoiceStatus::as_str) },
    )?)
}

async fn detail_page(
    state: &AppState,
    id: DbId,
    values: BTreeMap<String, String>,
    error: Option<&str>,
) -> AppResult<Html<String>> {
    let detail = load_invoice_detail(state, id).await?;
    let methods: Vec<_> = PaymentMethod::ALL
        .iter()
        .map(|m| (m.as_str(), m.label()))
        .collect();
    views::render(
        "invoices/detail.html",
        context! {
            detail,
            methods,
            values,
            error,
            today => today(),
            pdf_available => state.pdf.is_available(),
        },
    )
}

async fn detail(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Html<String>> {
    Ok(detail_page(&state, id, BTreeMap::new(), None).await?)
}

/// Redirect back to the invoice, or re-render it with the failure.
async fn after_action<T, E>(
    state: &AppState,
    id: DbId,
    result: Result<T, E>,
    values: BTreeMap<String, String>,
) -> PageResult<Response>
where
    E: Into<AppError>,
{
    match result {
        Ok(_) => Ok(Redirect::to(&format!("/invoices/{id}")).into_response()),
        Err(err) => {
            let (status, message) = recoverable(err)?;
            Ok(with_status(
                status,
                detail_page(state, id, values, Some(&message)).await?,
            ))
        }
    }
}

async fn mark_sent(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Response> {
    let result = InvoiceRepo::mark_sent(&state.pool, id).await;
    after_action(&state, id, result, BTreeMap::new()).await
}

async fn pay(state: &AppState, id: DbId, form: &FormFields) -> AppResult<()> {
    let input = RecordPayment {
        amount: form.amount("amount")?,
        method: form.text("method").parse::<PaymentMethod>()?,
        paid_on: form.optional_date("paid_on")?.unwrap_or_else(today),
    };
    InvoiceRepo::record_payment(&state.pool, id, &input).await?;
    Ok(())
}

async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = FormFields::from(pairs);
    let result = pay(&state, id, &form).await;
    after_action(&state, id, result, form.values()).await
}

async fn delete_payment(
    State(state): State<AppState>,
    Path((id, payment_id)): Path<(DbId, DbId)>,
) -> PageResult<Response> {
    let result = InvoiceRepo::delete_payment(&state.pool, id, payment_id).await;
    after_action(&state, id, result, BTreeMap::new()).await
}

async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Response> {
    if !InvoiceRepo::delete(&state.pool, id).await? {
        return Err(PageError::from(CoreError::NotFound {
            entity: "invoice",
            id,
        }));
    }
    tracing::info!(invoice_id = id, "Invoice deleted");
    Ok(Redirect::to("/invoices").into_response())
}

/// A missing or failing renderer shows the error page with 503.
async fn pdf(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Response> {
    let bytes = render_pdf(&state, id).await?;
    Ok(pdf_response(id, bytes))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list))
        .route("/invoices/{id}", get(detail))
        .route("/invoices/{id}/send", post(mark_sent))
        .route("/invoices/{id}/payments", post(record_payment))
        .route(
            "/invoices/{id}/payments/{payment_id}/delete",
            post(delete_payment),
        )
        .route("/invoices/{id}/delete", post(delete))
        .route("/invoices/{id}/pdf", get(pdf))
}
