//! Handlers for the `/quotes` resource, line items and quote lifecycle.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use landscaper_core::error::CoreError;
use landscaper_core::quote::QuoteStatus;
use landscaper_core::types::DbId;
use landscaper_core::validation::validate;
use landscaper_db::models::quote::{
    AcceptedQuote, CreateLineItem, CreateQuote, Quote, QuoteLineItem, UpdateQuote,
};
use landscaper_db::repositories::{ClientRepo, QuoteRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::today;
use crate::query::StatusFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// A quote with its line items.
#[derive(Debug, Serialize)]
pub struct QuoteDetail {
    #[serde(flatten)]
    pub quote: Quote,
    pub line_items: Vec<QuoteLineItem>,
}

pub async fn ensure_quote_exists(state: &AppState, id: DbId) -> AppResult<Quote> {
    QuoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "quote", id }))
}

pub async fn load_quote_detail(state: &AppState, id: DbId) -> AppResult<QuoteDetail> {
    let quote = ensure_quote_exists(state, id).await?;
    let line_items = QuoteRepo::line_items(&state.pool, id).await?;
    Ok(QuoteDetail { quote, line_items })
}

/// Validate a new quote, its line items and its client.
pub async fn check_quote_input(state: &AppState, input: &CreateQuote) -> AppResult<()> {
    validate(input)?;
    for item in &input.line_items {
        validate(item)?;
    }
    if ClientRepo::find_by_id(&state.pool, input.client_id)
        .await?
        .is_none()
    {
        return Err(CoreError::Validation(format!(
            "client_id: client {} does not exist",
            input.client_id
        ))
        .into());
    }
    Ok(())
}

/// POST /api/v1/quotes
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateQuote>,
) -> AppResult<(StatusCode, Json<DataResponse<QuoteDetail>>)> {
    check_quote_input(&state, &input).await?;
    let quote = QuoteRepo::create(&state.pool, &input).await?;
    let detail = load_quote_detail(&state, quote.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/quotes?status=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Quote>>>> {
    let status = params.parse::<QuoteStatus>()?;
    let quotes = QuoteRepo::list(&state.pool, status).await?;
    Ok(Json(DataResponse { data: quotes }))
}

/// GET /api/v1/quotes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<QuoteDetail>>> {
    let detail = load_quote_detail(&state, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/quotes/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateQuote>,
) -> AppResult<Json<DataResponse<Quote>>> {
    validate(&input)?;
    let quote = QuoteRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "quote", id }))?;
    tracing::info!(quote_id = id, "Quote updated");
    Ok(Json(DataResponse { data: quote }))
}

/// DELETE /api/v1/quotes/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if QuoteRepo::delete(&state.pool, id).await? {
        tracing::info!(quote_id = id, "Quote deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "quote", id }))
    }
}

// ---------------------------------------------------------------------------
// Line items
// ---------------------------------------------------------------------------

/// GET /api/v1/quotes/{id}/items
pub async fn list_items(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<QuoteLineItem>>>> {
    ensure_quote_exists(&state, id).await?;
    let items = QuoteRepo::line_items(&state.pool, id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/quotes/{id}/items
pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateLineItem>,
) -> AppResult<(StatusCode, Json<DataResponse<QuoteLineItem>>)> {
    validate(&input)?;
    let item = QuoteRepo::add_line_item(&state.pool, id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// DELETE /api/v1/quotes/{id}/items/{item_id}
pub async fn delete_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if QuoteRepo::delete_line_item(&state.pool, id, item_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "line item",
            id: item_id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// POST /api/v1/quotes/{id}/send
pub async fn send(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Quote>>> {
    let quote = QuoteRepo::send(&state.pool, id).await?;
    Ok(Json(DataResponse { data: quote }))
}

/// POST /api/v1/quotes/{id}/accept
///
/// The created job is scheduled for today.
pub async fn accept(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AcceptedQuote>>> {
    let accepted = QuoteRepo::accept(&state.pool, id, today()).await?;
    Ok(Json(DataResponse { data: accepted }))
}

/// POST /api/v1/quotes/{id}/decline
pub async fn decline(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Quote>>> {
    let quote = QuoteRepo::decline(&state.pool, id).await?;
    Ok(Json(DataResponse { data: quote }))
}
