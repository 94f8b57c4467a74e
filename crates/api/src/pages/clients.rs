//! Client directory screens.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use landscaper_core::error::CoreError;
use landscaper_core::types::DbId;
use landscaper_core::validation::validate;
use landscaper_db::models::client::{Client, CreateClient, UpdateClient};
use landscaper_db::repositories::{ClientRepo, JobRepo, QuoteRepo};
use minijinja::context;

use crate::error::{AppError, AppResult};
use crate::handlers::client::ensure_client_exists;
use crate::pages::forms::{FormFields, FormValues};
use crate::pages::{recoverable, with_status, PageError, PageResult};
use crate::state::AppState;
use crate::views;

async fn list(State(state): State<AppState>) -> PageResult<Html<String>> {
    let clients = ClientRepo::list(&state.pool).await?;
    Ok(views::render("clients/list.html", context! { clients })?)
}

fn form_page(
    client: Option<&Client>,
    values: BTreeMap<String, String>,
    error: Option<&str>,
) -> AppResult<Html<String>> {
    views::render("clients/form.html", context! { client, values, error })
}

fn client_values(client: &Client) -> BTreeMap<String, String> {
    FormValues::new()
        .set("name", &client.name)
        .set_opt("address", client.address.as_ref())
        .set_opt("phone", client.phone.as_ref())
        .set_opt("email", client.email.as_ref())
        .set_opt("notes", client.notes.as_ref())
        .build()
}

async fn new_form() -> PageResult<Html<String>> {
    Ok(form_page(None, BTreeMap::new(), None)?)
}

async fn insert(state: &AppState, form: &FormFields) -> AppResult<Client> {
    let input = CreateClient {
        name: form.text("name"),
        address: form.optional_text("address"),
        phone: form.optional_text("phone"),
        email: form.optional_text("email"),
        notes: form.optional_text("notes"),
    };
    validate(&input)?;
    let client = ClientRepo::create(&state.pool, &input).await?;
    tracing::info!(client_id = client.id, name = %client.name, "Client created");
    Ok(client)
}

async fn create(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = FormFields::from(pairs);
    match insert(&state, &form).await {
        Ok(client) => Ok(Redirect::to(&format!("/clients/{}", client.id)).into_response()),
        Err(err) => {
            let (status, message) = recoverable(err)?;
            Ok(with_status(status, form_page(None, form.values(), Some(&message))?))
        }
    }
}

pub(crate) async fn detail_page(
    state: &AppState,
    id: DbId,
    error: Option<&str>,
) -> AppResult<Html<String>> {
    let client = ensure_client_exists(state, id).await?;
    let jobs = JobRepo::list_by_client(&state.pool, id).await?;
    let quotes = QuoteRepo::list_by_client(&state.pool, id).await?;
    views::render(
        "clients/detail.html",
        context! {
            client,
            jobs,
            quotes,
            error,
            maps_api_key => state.config.google_maps_api_key.as_deref(),
        },
    )
}

async fn detail(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Html<String>> {
    Ok(detail_page(&state, id, None).await?)
}

async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> PageResult<Html<String>> {
    let client = ensure_client_exists(&state, id).await?;
    Ok(form_page(Some(&client), client_values(&client), None)?)
}

async fn save(state: &AppState, id: DbId, form: &FormFields) -> AppResult<Client> {
    let input = UpdateClient {
        name: Some(form.text("name")),
        address: Some(form.text("address")),
        phone: Some(form.text("phone")),
        email: Some(form.text("email")),
        notes: Some(form.text("notes")),
    }
    .normalized();
    validate(&input)?;
    let client = ClientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "client",
            id,
        }))?;
    tracing::info!(client_id = id, "Client updated");
    Ok(client)
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = FormFields::from(pairs);
    match save(&state, id, &form).await {
        Ok(client) => Ok(Redirect::to(&format!("/clients/{}", client.id)).into_response()),
        Err(err) => {
            let (status, message) = recoverable(err)?;
            let client = ensure_client_exists(&state, id).await?;
            Ok(with_status(
                status,
                form_page(Some(&client), form.values(), Some(&message))?,
            ))
        }
    }
}

async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Response> {
    match ClientRepo::delete(&state.pool, id).await {
        Ok(true) => {
            tracing::info!(client_id = id, "Client deleted");
            Ok(Redirect::to("/clients").into_response())
        }
        Ok(false) => Err(PageError::from(CoreError::NotFound {
            entity: "client",
            id,
        })),
        Err(err) => {
            let (status, message) = recoverable(err)?;
            Ok(with_status(status, detail_page(&state, id, Some(&message)).await?))
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list).post(create))
        .route("/clients/new", get(new_form))
        .route("/clients/{id}", get(detail))
        .route("/clients/{id}/edit", get(edit_form).post(update))
        .route("/clients/{id}/delete", post(delete))
}
