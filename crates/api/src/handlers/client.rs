//! Handlers for the `/clients` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use landscaper_core::error::CoreError;
use landscaper_core::types::DbId;
use landscaper_core::validation::validate;
use landscaper_db::models::client::{Client, CreateClient, UpdateClient};
use landscaper_db::models::job::Job;
use landscaper_db::models::quote::Quote;
use landscaper_db::repositories::{ClientRepo, JobRepo, QuoteRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a client or fail with `NotFound`.
pub async fn ensure_client_exists(state: &AppState, id: DbId) -> AppResult<Client> {
    ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "client",
            id,
        }))
}

/// POST /api/v1/clients
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<DataResponse<Client>>)> {
    let input = input.normalized();
    validate(&input)?;
    let client = ClientRepo::create(&state.pool, &input).await?;
    tracing::info!(client_id = client.id, name = %client.name, "Client created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: client })))
}

/// GET /api/v1/clients
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Client>>>> {
    let clients = ClientRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: clients }))
}

/// GET /api/v1/clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Client>>> {
    let client = ensure_client_exists(&state, id).await?;
    Ok(Json(DataResponse { data: client }))
}

/// PUT /api/v1/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<DataResponse<Client>>> {
    let input = input.normalized();
    validate(&input)?;
    let client = ClientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "client",
            id,
        }))?;
    tracing::info!(client_id = id, "Client updated");
    Ok(Json(DataResponse { data: client }))
}

/// DELETE /api/v1/clients/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if ClientRepo::delete(&state.pool, id).await? {
        tracing::info!(client_id = id, "Client deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "client",
            id,
        }))
    }
}

/// GET /api/v1/clients/{id}/jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Job>>>> {
    ensure_client_exists(&state, id).await?;
    let jobs = JobRepo::list_by_client(&state.pool, id).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /api/v1/clients/{id}/quotes
pub async fn list_quotes(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Quote>>>> {
    ensure_client_exists(&state, id).await?;
    let quotes = QuoteRepo::list_by_client(&state.pool, id).await?;
    Ok(Json(DataResponse { data: quotes }))
}
