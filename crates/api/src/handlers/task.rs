//! Handlers for a job's task checklist (`/jobs/{id}/tasks`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use landscaper_core::error::CoreError;
use landscaper_core::types::DbId;
use landscaper_core::validation::validate;
use landscaper_db::models::task::{CreateTask, Task};
use landscaper_db::repositories::TaskRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::job::ensure_job_exists;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/jobs/{job_id}/tasks
pub async fn list(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    ensure_job_exists(&state, job_id).await?;
    let tasks = TaskRepo::list_by_job(&state.pool, job_id).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /api/v1/jobs/{job_id}/tasks
pub async fn create(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    validate(&input)?;
    ensure_job_exists(&state, job_id).await?;
    let task = TaskRepo::create(&state.pool, job_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// POST /api/v1/jobs/{job_id}/tasks/{id}/toggle
pub async fn toggle(
    State(state): State<AppState>,
    Path((job_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = TaskRepo::toggle(&state.pool, job_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "task", id }))?;
    Ok(Json(DataResponse { data: task }))
}

/// DELETE /api/v1/jobs/{job_id}/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((job_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if TaskRepo::delete(&state.pool, job_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "task", id }))
    }
}
