//! Job screens: scheduling, lifecycle actions, tasks and invoicing.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use landscaper_core::error::CoreError;
use landscaper_core::job::{Actuals, JobStatus};
use landscaper_core::types::DbId;
use landscaper_core::validation::validate;
use landscaper_db::models::invoice::CreateInvoice;
use landscaper_db::models::job::{CreateJob, Job};
use landscaper_db::models::task::CreateTask;
use landscaper_db::repositories::{
    ClientRepo, CrewRepo, InvoiceRepo, JobRepo, MemberRepo, TaskRepo,
};
use minijinja::context;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::job::{check_job_input, ensure_job_exists, load_job_detail};
use crate::handlers::today;
use crate::pages::forms::{FormFields, FormValues};
use crate::pages::{recoverable, with_status, PageError, PageResult};
use crate::query::StatusFilterParams;
use crate::state::AppState;
use crate::views;

fn status_options() -> Vec<(&'static str, &'static str)> {
    JobStatus::ALL.iter().map(|s| (s.as_str(), s.label())).collect()
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<StatusFilterParams>,
) -> PageResult<Html<String>> {
    let status = params.parse::<JobStatus>()?;
    let jobs = JobRepo::list(&state.pool, status).await?;
    Ok(views::render(
        "jobs/list.html",
        context! {
            jobs,
            statuses => status_options(),
            selected => status.map(JobStatus::as_str),
        },
    )?)
}

/// Prefill values for `/jobs/new?client_id=&date=`.
#[derive(Debug, Default, Deserialize)]
struct NewJobParams {
    client_id: Option<String>,
    date: Option<String>,
}

async fn form_page(
    state: &AppState,
    job: Option<&Job>,
    values: BTreeMap<String, String>,
    selected_members: Vec<DbId>,
    error: Option<&str>,
) -> AppResult<Html<String>> {
    let clients = ClientRepo::list(&state.pool).await?;
    let crews = CrewRepo::list(&state.pool).await?;
    let members = MemberRepo::list(&state.pool).await?;
    views::render(
        "jobs/form.html",
        context! { job, values, selected_members, clients, crews, members, error },
    )
}

fn job_input(form: &FormFields) -> Result<CreateJob, CoreError> {
    Ok(CreateJob {
        client_id: form.id("client_id")?,
        crew_id: form.optional_id("crew_id")?,
        description: form.text("description"),
        scheduled_date: form.date("scheduled_date")?,
        estimated_hours: form.optional_number("estimated_hours")?,
        estimated_cost: form.optional_amount("estimated_cost")?,
        member_ids: form.ids("member_ids")?,
    })
}

/// Member ids to keep selected when a form is re-rendered, ignoring junk.
fn submitted_members(form: &FormFields) -> Vec<DbId> {
    form.all("member_ids")
        .into_iter()
        .filter_map(|raw| raw.trim().parse().ok())
        .collect()
}

async fn new_form(
    State(state): State<AppState>,
    Query(params): Query<NewJobParams>,
) -> PageResult<Html<String>> {
    let values = FormValues::new()
        .set_opt("client_id", params.client_id)
        .set("scheduled_date", params.date.unwrap_or_else(|| today().to_string()))
        .build();
    Ok(form_page(&state, None, values, Vec::new(), None).await?)
}

async fn insert(state: &AppState, form: &FormFields) -> AppResult<Job> {
    let input = job_input(form)?;
    check_job_input(state, &input).await?;
    let job = JobRepo::create(&state.pool, &input).await?;
    tracing::info!(job_id = job.id, client_id = job.client_id, scheduled_date = %job.scheduled_date, "Job scheduled");
    Ok(job)
}

async fn create(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = FormFields::from(pairs);
    match insert(&state, &form).await {
        Ok(job) => Ok(Redirect::to(&format!("/jobs/{}", job.id)).into_response()),
        Err(err) => {
            let (status, message) = recoverable(err)?;
            let page = form_page(
                &state,
                None,
                form.values(),
                submitted_members(&form),
                Some(&message),
            )
            .await?;
            Ok(with_status(status, page))
        }
    }
}

async fn detail_page(state: &AppState, id: DbId, error: Option<&str>) -> AppResult<Html<String>> {
    let detail = load_job_detail(state, id).await?;
    views::render(
        "jobs/detail.html",
        context! {
            detail,
            error,
            pdf_available => state.pdf.is_available(),
        },
    )
}

async fn detail(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Html<String>> {
    Ok(detail_page(&state, id, None).await?)
}

/// Redirect back to the job, or re-render it with the failure.
async fn after_action<T, E>(state: &AppState, id: DbId, result: Result<T, E>) -> PageResult<Response>
where
    E: Into<AppError>,
{
    match result {
        Ok(_) => Ok(Redirect::to(&format!("/jobs/{id}")).into_response()),
        Err(err) => {
            let (status, message) = recoverable(err)?;
            Ok(with_status(status, detail_page(state, id, Some(&message)).await?))
        }
    }
}

async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> PageResult<Html<String>> {
    let job = ensure_job_exists(&state, id).await?;
    let members = JobRepo::members(&state.pool, id).await?;
    let values = FormValues::new()
        .set("client_id", job.client_id)
        .set_opt("crew_id", job.crew_id)
        .set("description", &job.description)
        .set("scheduled_date", job.scheduled_date)
        .set_opt("estimated_hours", job.estimated_hours)
        .set_amount("estimated_cost", job.estimated_cost)
        .build();
    let selected = members.iter().map(|m| m.id).collect();
    Ok(form_page(&state, Some(&job), values, selected, None).await?)
}

async fn save(state: &AppState, id: DbId, form: &FormFields) -> AppResult<Job> {
    let input = job_input(form)?;
    check_job_input(state, &input).await?;
    let job = JobRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "job", id }))?;
    tracing::info!(job_id = id, "Job updated");
    Ok(job)
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = FormFields::from(pairs);
    match save(&state, id, &form).await {
        Ok(job) => Ok(Redirect::to(&format!("/jobs/{}", job.id)).into_response()),
        Err(err) => {
            let (status, message) = recoverable(err)?;
            let job = ensure_job_exists(&state, id).await?;
            let page = form_page(
                &state,
                Some(&job),
                form.values(),
                submitted_members(&form),
                Some(&message),
            )
            .await?;
            Ok(with_status(status, page))
        }
    }
}

async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Response> {
    if !JobRepo::delete(&state.pool, id).await? {
        return Err(PageError::from(CoreError::NotFound { entity: "job", id }));
    }
    tracing::info!(job_id = id, "Job deleted");
    Ok(Redirect::to("/jobs").into_response())
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

async fn start(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Response> {
    let result = JobRepo::start(&state.pool, id).await;
    after_action(&state, id, result).await
}

async fn cancel(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Response> {
    let result = JobRepo::cancel(&state.pool, id).await;
    after_action(&state, id, result).await
}

async fn on_my_way(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Response> {
    let result = JobRepo::notify_on_my_way(&state.pool, id).await;
    after_action(&state, id, result).await
}

async fn finish(state: &AppState, id: DbId, form: &FormFields) -> AppResult<()> {
    let actuals = Actuals {
        hours: form.optional_number("actual_hours")?.unwrap_or(0.0),
        cost: form.optional_amount("actual_cost")?.unwrap_or(0),
    };
    JobRepo::complete(&state.pool, id, &actuals).await?;
    Ok(())
}

async fn complete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = FormFields::from(pairs);
    let result = finish(&state, id, &form).await;
    after_action(&state, id, result).await
}

async fn raise_invoice(state: &AppState, id: DbId, form: &FormFields) -> AppResult<()> {
    let input = CreateInvoice {
        total: form.amount("total")?,
    };
    InvoiceRepo::create_for_job(&state.pool, id, &input).await?;
    Ok(())
}

async fn create_invoice(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = FormFields::from(pairs);
    let result = raise_invoice(&state, id, &form).await;
    after_action(&state, id, result).await
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

async fn add(state: &AppState, id: DbId, form: &FormFields) -> AppResult<()> {
    let input = CreateTask {
        description: form.text("description"),
    };
    validate(&input)?;
    ensure_job_exists(state, id).await?;
    TaskRepo::create(&state.pool, id, &input).await?;
    Ok(())
}

async fn add_task(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = FormFields::from(pairs);
    let result = add(&state, id, &form).await;
    after_action(&state, id, result).await
}

async fn toggle_task(
    State(state): State<AppState>,
    Path((id, task_id)): Path<(DbId, DbId)>,
) -> PageResult<Response> {
    TaskRepo::toggle(&state.pool, id, task_id)
        .await?
        .ok_or(PageError::from(CoreError::NotFound {
            entity: "task",
            id: task_id,
        }))?;
    Ok(Redirect::to(&format!("/jobs/{id}")).into_response())
}

async fn delete_task(
    State(state): State<AppState>,
    Path((id, task_id)): Path<(DbId, DbId)>,
) -> PageResult<Response> {
    TaskRepo::delete(&state.pool, id, task_id).await?;
    Ok(Redirect::to(&format!("/jobs/{id}")).into_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list).post(create))
        .route("/jobs/new", get(new_form))
        .route("/jobs/{id}", get(detail))
        .route("/jobs/{id}/edit", get(edit_form).post(update))
        .route("/jobs/{id}/delete", post(delete))
        .route("/jobs/{id}/start", post(start))
        .route("/jobs/{id}/complete", post(complete))
        .route("/jobs/{id}/cancel", post(cancel))
        .route("/jobs/{id}/on-my-way", post(on_my_way))
        .route("/jobs/{id}/invoice", post(create_invoice))
        .route("/jobs/{id}/tasks", post(add_task))
        .route("/jobs/{id}/tasks/{task_id}/toggle", post(toggle_task))
        .route("/jobs/{id}/tasks/{task_id}/delete", post(delete_task))
}
