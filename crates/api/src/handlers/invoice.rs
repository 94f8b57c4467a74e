//! Handlers for the `/invoices` resource, payments and PDF export.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use landscaper_core::error::CoreError;
use landscaper_core::invoice::{InvoiceStatus, PaymentMethod};
use landscaper_core::types::{Cents, DbId};
use landscaper_db::models::invoice::{Invoice, Payment, PaymentReceipt, RecordPayment};
use landscaper_db::repositories::{ClientRepo, InvoiceRepo};
use minijinja::context;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::today;
use crate::query::StatusFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views;

/// An invoice with its payments.
#[derive(Debug, Serialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub balance: Cents,
    pub payments: Vec<Payment>,
}

/// Body for `POST /invoices/{id}/payments`. The date defaults to today.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub amount: Cents,
    pub method: PaymentMethod,
    pub paid_on: Option<NaiveDate>,
}

impl From<PaymentRequest> for RecordPayment {
    fn from(req: PaymentRequest) -> Self {
        RecordPayment {
            amount: req.amount,
            method: req.method,
            paid_on: req.paid_on.unwrap_or_else(today),
        }
    }
}

pub async fn ensure_invoice_exists(state: &AppState, id: DbId) -> AppResult<Invoice> {
    InvoiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "invoice",
            id,
        }))
}

pub async fn load_invoice_detail(state: &AppState, id: DbId) -> AppResult<InvoiceDetail> {
    let invoice = ensure_invoice_exists(state, id).await?;
    let payments = InvoiceRepo::payments(&state.pool, id).await?;
    Ok(InvoiceDetail {
        balance: invoice.balance(),
        invoice,
        payments,
    })
}

/// GET /api/v1/invoices?status=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Invoice>>>> {
    let status = params.parse::<InvoiceStatus>()?;
    let invoices = InvoiceRepo::list(&state.pool, status).await?;
    Ok(Json(DataResponse { data: invoices }))
}

/// GET /api/v1/invoices/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<InvoiceDetail>>> {
    let detail = load_invoice_detail(&state, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/invoices/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if InvoiceRepo::delete(&state.pool, id).await? {
        tracing::info!(invoice_id = id, "Invoice deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "invoice",
            id,
        }))
    }
}

/// POST /api/v1/invoices/{id}/send
pub async fn mark_sent(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Invoice>>> {
    let invoice = InvoiceRepo::mark_sent(&state.pool, id).await?;
    Ok(Json(DataResponse { data: invoice }))
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

/// GET /api/v1/invoices/{id}/payments
pub async fn list_payments(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Payment>>>> {
    ensure_invoice_exists(&state, id).await?;
    let payments = InvoiceRepo::payments(&state.pool, id).await?;
    Ok(Json(DataResponse { data: payments }))
}

/// POST /api/v1/invoices/{id}/payments
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<PaymentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<PaymentReceipt>>)> {
    let receipt = InvoiceRepo::record_payment(&state.pool, id, &input.into()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: receipt })))
}

/// DELETE /api/v1/invoices/{id}/payments/{payment_id}
pub async fn delete_payment(
    State(state): State<AppState>,
    Path((id, payment_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Invoice>>> {
    let invoice = InvoiceRepo::delete_payment(&state.pool, id, payment_id).await?;
    Ok(Json(DataResponse { data: invoice }))
}

// ---------------------------------------------------------------------------
// PDF export
// ---------------------------------------------------------------------------

/// Render an invoice to PDF bytes through the configured renderer.
pub async fn render_pdf(state: &AppState, id: DbId) -> AppResult<Vec<u8>> {
    let detail = load_invoice_detail(state, id).await?;
    let client = ClientRepo::find_by_id(&state.pool, detail.invoice.client_id).await?;
    let html = views::render_html(
        "invoices/pdf.html",
        context! { detail => &detail, client => client, issued_on => today() },
    )?;
    let bytes = state.pdf.render(&html).await?;
    tracing::info!(invoice_id = id, size = bytes.len(), "Invoice PDF rendered");
    Ok(bytes)
}

/// Wrap PDF bytes as a download.
pub fn pdf_response(id: DbId, bytes: Vec<u8>) -> Response {
    (
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"invoice-{id}.pdf\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// GET /api/v1/invoices/{id}/pdf
pub async fn export_pdf(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Response> {
    let bytes = render_pdf(&state, id).await?;
    Ok(pdf_response(id, bytes))
}
