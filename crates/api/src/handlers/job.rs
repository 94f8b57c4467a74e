//! Handlers for the `/jobs` resource and job lifecycle actions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use landscaper_core::error::CoreError;
use landscaper_core::job::{Actuals, JobStatus};
use landscaper_core::types::DbId;
use landscaper_core::validation::validate;
use landscaper_db::models::invoice::{CreateInvoice, Invoice};
use landscaper_db::models::job::{CompletedJob, CreateJob, Job, UpdateJob};
use landscaper_db::models::member::Member;
use landscaper_db::models::task::Task;
use landscaper_db::repositories::{ClientRepo, CrewRepo, InvoiceRepo, JobRepo, MemberRepo, TaskRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::query::StatusFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// A job with its assignments, checklist and invoice.
#[derive(Debug, Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: Job,
    pub members: Vec<Member>,
    pub tasks: Vec<Task>,
    pub invoice: Option<Invoice>,
}

pub async fn ensure_job_exists(state: &AppState, id: DbId) -> AppResult<Job> {
    JobRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "job", id }))
}

pub async fn load_job_detail(state: &AppState, id: DbId) -> AppResult<JobDetail> {
    let job = ensure_job_exists(state, id).await?;
    let members = JobRepo::members(&state.pool, id).await?;
    let tasks = TaskRepo::list_by_job(&state.pool, id).await?;
    let invoice = InvoiceRepo::find_by_job(&state.pool, id).await?;
    Ok(JobDetail {
        job,
        members,
        tasks,
        invoice,
    })
}

/// Validate a job payload and confirm the client, crew and members it
/// references exist.
pub async fn check_job_input(state: &AppState, input: &CreateJob) -> AppResult<()> {
    validate(input)?;
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
    if let Some(crew_id) = input.crew_id {
        if CrewRepo::find_by_id(&state.pool, crew_id).await?.is_none() {
            return Err(
                CoreError::Validation(format!("crew_id: crew {crew_id} does not exist")).into(),
            );
        }
    }
    for member_id in &input.member_ids {
        if MemberRepo::find_by_id(&state.pool, *member_id)
            .await?
            .is_none()
        {
            return Err(CoreError::Validation(format!(
                "member_ids: member {member_id} does not exist"
            ))
            .into());
        }
    }
    Ok(())
}

/// POST /api/v1/jobs
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateJob>,
) -> AppResult<(StatusCode, Json<DataResponse<Job>>)> {
    check_job_input(&state, &input).await?;
    let job = JobRepo::create(&state.pool, &input).await?;
    tracing::info!(job_id = job.id, client_id = job.client_id, scheduled_date = %job.scheduled_date, "Job scheduled");
    Ok((StatusCode::CREATED, Json(DataResponse { data: job })))
}

/// GET /api/v1/jobs?status=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Job>>>> {
    let status = params.parse::<JobStatus>()?;
    let jobs = JobRepo::list(&state.pool, status).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /api/v1/jobs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<JobDetail>>> {
    let detail = load_job_detail(&state, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/jobs/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateJob>,
) -> AppResult<Json<DataResponse<Job>>> {
    check_job_input(&state, &input).await?;
    let job = JobRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "job", id }))?;
    tracing::info!(job_id = id, "Job updated");
    Ok(Json(DataResponse { data: job }))
}

/// DELETE /api/v1/jobs/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if JobRepo::delete(&state.pool, id).await? {
        tracing::info!(job_id = id, "Job deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "job", id }))
    }
}

/// GET /api/v1/jobs/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Member>>>> {
    ensure_job_exists(&state, id).await?;
    let members = JobRepo::members(&state.pool, id).await?;
    Ok(Json(DataResponse { data: members }))
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs/{id}/start
pub async fn start(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Job>>> {
    let job = JobRepo::start(&state.pool, id).await?;
    Ok(Json(DataResponse { data: job }))
}

/// POST /api/v1/jobs/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(actuals): Json<Actuals>,
) -> AppResult<Json<DataResponse<CompletedJob>>> {
    let completed = JobRepo::complete(&state.pool, id, &actuals).await?;
    Ok(Json(DataResponse { data: completed }))
}

/// POST /api/v1/jobs/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Job>>> {
    let job = JobRepo::cancel(&state.pool, id).await?;
    Ok(Json(DataResponse { data: job }))
}

/// POST /api/v1/jobs/{id}/notify
pub async fn notify_on_my_way(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Job>>> {
    let job = JobRepo::notify_on_my_way(&state.pool, id).await?;
    Ok(Json(DataResponse { data: job }))
}

// ---------------------------------------------------------------------------
// Invoice
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs/{id}/invoice
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Invoice>>> {
    ensure_job_exists(&state, id).await?;
    let invoice = InvoiceRepo::find_by_job(&state.pool, id).await?.ok_or(AppError::Core(
        CoreError::NotFound {
            entity: "invoice for job",
            id,
        },
    ))?;
    Ok(Json(DataResponse { data: invoice }))
}

/// POST /api/v1/jobs/{id}/invoice
pub async fn create_invoice(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateInvoice>,
) -> AppResult<(StatusCode, Json<DataResponse<Invoice>>)> {
    let invoice = InvoiceRepo::create_for_job(&state.pool, id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: invoice })))
}
