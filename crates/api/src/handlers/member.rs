//! Handlers for the `/members` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use landscaper_core::error::CoreError;
use landscaper_core::types::DbId;
use landscaper_core::validation::validate;
use landscaper_db::models::crew::Crew;
use landscaper_db::models::job::Job;
use landscaper_db::models::member::{CreateMember, Member, UpdateMember};
use landscaper_db::repositories::{JobRepo, MemberRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

pub async fn ensure_member_exists(state: &AppState, id: DbId) -> AppResult<Member> {
    MemberRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "member",
            id,
        }))
}

/// POST /api/v1/members
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateMember>,
) -> AppResult<(StatusCode, Json<DataResponse<Member>>)> {
    validate(&input)?;
    let member = MemberRepo::create(&state.pool, &input).await?;
    tracing::info!(member_id = member.id, name = %member.name, "Member created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// GET /api/v1/members
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Member>>>> {
    let members = MemberRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: members }))
}

/// GET /api/v1/members/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Member>>> {
    let member = ensure_member_exists(&state, id).await?;
    Ok(Json(DataResponse { data: member }))
}

/// PUT /api/v1/members/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMember>,
) -> AppResult<Json<DataResponse<Member>>> {
    validate(&input)?;
    let member = MemberRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "member",
            id,
        }))?;
    Ok(Json(DataResponse { data: member }))
}

/// DELETE /api/v1/members/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if MemberRepo::delete(&state.pool, id).await? {
        tracing::info!(member_id = id, "Member deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "member",
            id,
        }))
    }
}

/// GET /api/v1/members/{id}/crews
pub async fn list_crews(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Crew>>>> {
    ensure_member_exists(&state, id).await?;
    let crews = MemberRepo::crews(&state.pool, id).await?;
    Ok(Json(DataResponse { data: crews }))
}

/// GET /api/v1/members/{id}/jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Job>>>> {
    ensure_member_exists(&state, id).await?;
    let jobs = JobRepo::list_by_member(&state.pool, id).await?;
    Ok(Json(DataResponse { data: jobs }))
}
