//! Handlers for the `/crews` resource and crew membership.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use landscaper_core::error::CoreError;
use landscaper_core::types::DbId;
use landscaper_core::validation::validate;
use landscaper_db::models::crew::{CreateCrew, Crew, UpdateCrew};
use landscaper_db::models::job::Job;
use landscaper_db::models::member::Member;
use landscaper_db::repositories::{CrewRepo, JobRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::member::ensure_member_exists;
use crate::response::DataResponse;
use crate::state::AppState;

/// A crew with its members.
#[derive(Debug, Serialize)]
pub struct CrewDetail {
    #[serde(flatten)]
    pub crew: Crew,
    pub members: Vec<Member>,
}

/// Body for `POST /crews/{id}/members`.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub member_id: DbId,
}

pub async fn ensure_crew_exists(state: &AppState, id: DbId) -> AppResult<Crew> {
    CrewRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "crew", id }))
}

/// POST /api/v1/crews
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCrew>,
) -> AppResult<(StatusCode, Json<DataResponse<Crew>>)> {
    validate(&input)?;
    let crew = CrewRepo::create(&state.pool, &input).await?;
    tracing::info!(crew_id = crew.id, name = %crew.name, "Crew created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: crew })))
}

/// GET /api/v1/crews
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Crew>>>> {
    let crews = CrewRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: crews }))
}

/// GET /api/v1/crews/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CrewDetail>>> {
    let crew = ensure_crew_exists(&state, id).await?;
    let members = CrewRepo::members(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: CrewDetail { crew, members },
    }))
}

/// PUT /api/v1/crews/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCrew>,
) -> AppResult<Json<DataResponse<Crew>>> {
    validate(&input)?;
    let crew = CrewRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "crew", id }))?;
    Ok(Json(DataResponse { data: crew }))
}

/// DELETE /api/v1/crews/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if CrewRepo::delete(&state.pool, id).await? {
        tracing::info!(crew_id = id, "Crew deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "crew", id }))
    }
}

/// GET /api/v1/crews/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Member>>>> {
    ensure_crew_exists(&state, id).await?;
    let members = CrewRepo::members(&state.pool, id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// POST /api/v1/crews/{id}/members
pub async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddMemberRequest>,
) -> AppResult<Json<DataResponse<Vec<Member>>>> {
    ensure_crew_exists(&state, id).await?;
    ensure_member_exists(&state, input.member_id).await?;
    if CrewRepo::add_member(&state.pool, id, input.member_id).await? {
        tracing::info!(crew_id = id, member_id = input.member_id, "Member added to crew");
    }
    let members = CrewRepo::members(&state.pool, id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// DELETE /api/v1/crews/{id}/members/{member_id}
pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if CrewRepo::remove_member(&state.pool, id, member_id).await? {
        tracing::info!(crew_id = id, member_id, "Member removed from crew");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "crew member",
            id: member_id,
        }))
    }
}

/// GET /api/v1/crews/{id}/jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Job>>>> {
    ensure_crew_exists(&state, id).await?;
    let jobs = JobRepo::list_by_crew(&state.pool, id).await?;
    Ok(Json(DataResponse { data: jobs }))
}
