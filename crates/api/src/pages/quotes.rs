//! Quote screens: drafting, line items and the send/accept/decline actions.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use landscaper_core::error::CoreError;
use landscaper_core::money::parse_amount;
use landscaper_core::quote::QuoteStatus;
use landscaper_core::types::DbId;
use landscaper_core::validation::validate;
use landscaper_db::models::quote::{CreateLineItem, CreateQuote, Quote, UpdateQuote};
use landscaper_db::repositories::{ClientRepo, QuoteRepo};
use minijinja::context;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::quote::{check_quote_input, ensure_quote_exists, load_quote_detail};
use crate::handlers::today;
use crate::pages::forms::{FormFields, FormValues};
use crate::pages::{recoverable, with_status, PageError, PageResult};
use crate::query::StatusFilterParams;
use crate::state::AppState;
use crate::views;

/// Blank line-item rows offered on the new quote form.
const BLANK_ITEM_ROWS: usize = 5;

async fn list(
    State(state): State<AppState>,
    Query(params): Query<StatusFilterParams>,
) -> PageResult<Html<String>> {
    let status = params.parse::<QuoteStatus>()?;
    let quotes = QuoteRepo::list(&state.pool, status).await?;
    let statuses: Vec<_> = QuoteStatus::ALL
        .iter()
        .map(|s| (s.as_str(), s.label()))
        .collect();
    Ok(views::render(
        "quotes/list.html",
        context! { quotes, statuses, selected => status.map(QuoteStatus::as_str) },
    )?)
}

#[derive(Debug, Default, Deserialize)]
struct NewQuoteParams {
    client_id: Option<String>,
}

/// One editable line-item row on the new quote form.
#[derive(Debug, Default, serde::Serialize)]
struct ItemRow {
    description: String,
    quantity: String,
    unit_price: String,
}

async fn form_page(
    state: &AppState,
    quote: Option<&Quote>,
    values: BTreeMap<String, String>,
    rows: Vec<ItemRow>,
    error: Option<&str>,
) -> AppResult<Html<String>> {
    let clients = ClientRepo::list(&state.pool).await?;
    views::render(
        "quotes/form.html",
        context! { quote, values, rows, clients, error },
    )
}

fn blank_rows() -> Vec<ItemRow> {
    (0..BLANK_ITEM_ROWS).map(|_| ItemRow::default()).collect()
}

/// The submitted item rows, padded back out to the blank row count.
fn submitted_rows(form: &FormFields) -> Vec<ItemRow> {
    let descriptions = form.all("item_description");
    let quantities = form.all("item_quantity");
    let prices = form.all("item_unit_price");
    let mut rows: Vec<ItemRow> = descriptions
        .iter()
        .enumerate()
        .map(|(i, description)| ItemRow {
            description: description.to_string(),
            quantity: quantities.get(i).copied().unwrap_or_default().to_string(),
            unit_price: prices.get(i).copied().unwrap_or_default().to_string(),
        })
        .collect();
    while rows.len() < BLANK_ITEM_ROWS {
        rows.push(ItemRow::default());
    }
    rows
}

/// Line items from the repeated `item_*` fields. Rows without a description
/// are skipped and a blank quantity means one.
fn line_items(form: &FormFields) -> Result<Vec<CreateLineItem>, CoreError> {
    submitted_rows(form)
        .into_iter()
        .enumerate()
        .filter(|(_, row)| !row.description.trim().is_empty())
        .map(|(i, row)| line_item(i + 1, &row))
        .collect()
}

fn line_item(row_number: usize, row: &ItemRow) -> Result<CreateLineItem, CoreError> {
    let quantity = row.quantity.trim();
    let quantity = if quantity.is_empty() {
        1.0
    } else {
        quantity.parse().map_err(|_| {
            CoreError::Validation(format!(
                "item {row_number}: quantity '{quantity}' is not valid"
            ))
        })?
    };
    Ok(CreateLineItem {
        description: row.description.trim().to_string(),
        quantity,
        unit_price: parse_amount(&row.unit_price)?,
    })
}

async fn new_form(
    State(state): State<AppState>,
    Query(params): Query<NewQuoteParams>,
) -> PageResult<Html<String>> {
    let values = FormValues::new()
        .set_opt("client_id", params.client_id)
        .build();
    Ok(form_page(&state, None, values, blank_rows(), None).await?)
}

async fn insert(state: &AppState, form: &FormFields) -> AppResult<Quote> {
    let input = CreateQuote {
        client_id: form.id("client_id")?,
        description: form.text("description"),
        estimated_hours: form.optional_number("estimated_hours")?,
        valid_until: form.optional_date("valid_until")?,
        line_items: line_items(form)?,
    };
    check_quote_input(state, &input).await?;
    let quote = QuoteRepo::create(&state.pool, &input).await?;
    Ok(quote)
}

async fn create(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = FormFields::from(pairs);
    match insert(&state, &form).await {
        Ok(quote) => Ok(Redirect::to(&format!("/quotes/{}", quote.id)).into_response()),
        Err(err) => {
            let (status, message) = recoverable(err)?;
            let page = form_page(
                &state,
                None,
                form.values(),
                submitted_rows(&form),
                Some(&message),
            )
            .await?;
            Ok(with_status(status, page))
        }
    }
}

async fn detail_page(state: &AppState, id: DbId, error: Option<&str>) -> AppResult<Html<String>> {
    let detail = load_quote_detail(state, id).await?;
    views::render(
        "quotes/detail.html",
        context! { detail, error, today => today() },
    )
}

async fn detail(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Html<String>> {
    Ok(detail_page(&state, id, None).await?)
}

/// Redirect back to the quote, or re-render it with the failure.
async fn after_action<T, E>(state: &AppState, id: DbId, result: Result<T, E>) -> PageResult<Response>
where
    E: Into<AppError>,
{
    match result {
        Ok(_) => Ok(Redirect::to(&format!("/quotes/{id}")).into_response()),
        Err(err) => {
            let (status, message) = recoverable(err)?;
            Ok(with_status(status, detail_page(state, id, Some(&message)).await?))
        }
    }
}

async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> PageResult<Response> {
    let quote = ensure_quote_exists(&state, id).await?;
    if let Err(err) = quote.status.ensure_editable() {
        let (status, message) = recoverable(err)?;
        return Ok(with_status(status, detail_page(&state, id, Some(&message)).await?));
    }
    let values = FormValues::new()
        .set("client_id", quote.client_id)
        .set("description", &quote.description)
        .set_opt("estimated_hours", quote.estimated_hours)
        .set_opt("valid_until", quote.valid_until)
        .build();
    Ok(form_page(&state, Some(&quote), values, Vec::new(), None)
        .await?
        .into_response())
}

async fn save(state: &AppState, id: DbId, form: &FormFields) -> AppResult<Quote> {
    let input = UpdateQuote {
        description: Some(form.text("description")),
        estimated_hours: Some(form.optional_number("estimated_hours")?),
        valid_until: Some(form.optional_date("valid_until")?),
    };
    validate(&input)?;
    let quote = QuoteRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "quote", id }))?;
    tracing::info!(quote_id = id, "Quote updated");
    Ok(quote)
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = FormFields::from(pairs);
    match save(&state, id, &form).await {
        Ok(quote) => Ok(Redirect::to(&format!("/quotes/{}", quote.id)).into_response()),
        Err(err) => {
            let (status, message) = recoverable(err)?;
            let quote = ensure_quote_exists(&state, id).await?;
            let page = form_page(&state, Some(&quote), form.values(), Vec::new(), Some(&message))
                .await?;
            Ok(with_status(status, page))
        }
    }
}

async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Response> {
    if !QuoteRepo::delete(&state.pool, id).await? {
        return Err(PageError::from(CoreError::NotFound { entity: "quote", id }));
    }
    tracing::info!(quote_id = id, "Quote deleted");
    Ok(Redirect::to("/quotes").into_response())
}

// ---------------------------------------------------------------------------
// Line items
// ---------------------------------------------------------------------------

async fn add(state: &AppState, id: DbId, form: &FormFields) -> AppResult<()> {
    let row = ItemRow {
        description: form.text("description"),
        quantity: form.text("quantity"),
        unit_price: form.text("unit_price"),
    };
    let input = line_item(1, &row)?;
    validate(&input)?;
    QuoteRepo::add_line_item(&state.pool, id, &input).await?;
    Ok(())
}

async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = FormFields::from(pairs);
    let result = add(&state, id, &form).await;
    after_action(&state, id, result).await
}

async fn delete_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(DbId, DbId)>,
) -> PageResult<Response> {
    let result = QuoteRepo::delete_line_item(&state.pool, id, item_id).await;
    after_action(&state, id, result).await
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

async fn send(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Response> {
    let result = QuoteRepo::send(&state.pool, id).await;
    after_action(&state, id, result).await
}

async fn decline(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Response> {
    let result = QuoteRepo::decline(&state.pool, id).await;
    after_action(&state, id, result).await
}

async fn convert(state: &AppState, id: DbId, form: &FormFields) -> AppResult<DbId> {
    let scheduled_date = form.optional_date("scheduled_date")?.unwrap_or_else(today);
    let accepted = QuoteRepo::accept(&state.pool, id, scheduled_date).await?;
    Ok(accepted.job.id)
}

/// Accepting sends the user to the job it created.
async fn accept(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = FormFields::from(pairs);
    match convert(&state, id, &form).await {
        Ok(job_id) => Ok(Redirect::to(&format!("/jobs/{job_id}")).into_response()),
        Err(err) => after_action(&state, id, Err::<(), _>(err)).await,
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quotes", get(list).post(create))
        .route("/quotes/new", get(new_form))
        .route("/quotes/{id}", get(detail))
        .route("/quotes/{id}/edit", get(edit_form).post(update))
        .route("/quotes/{id}/delete", post(delete))
        .route("/quotes/{id}/items", post(add_item))
        .route("/quotes/{id}/items/{item_id}/delete", post(delete_item))
        .route("/quotes/{id}/send", post(send))
        .route("/quotes/{id}/accept", post(accept))
        .route("/quotes/{id}/decline", post(decline))
}
