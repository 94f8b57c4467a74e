//! Crew screens, including member assignment.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use landscaper_core::error::CoreError;
use landscaper_core::types::DbId;
use landscaper_core::validation::validate;
use landscaper_db::models::crew::{CreateCrew, Crew, UpdateCrew};
use landscaper_db::repositories::{CrewRepo, JobRepo, MemberRepo};
use minijinja::context;

use crate::error::{AppError, AppResult};
use crate::handlers::crew::ensure_crew_exists;
use crate::pages::forms::{FormFields, FormValues};
use crate::pages::{recoverable, with_status, PageError, PageResult};
use crate::state::AppState;
use crate::views;

async fn list(State(state): State<AppState>) -> PageResult<Html<String>> {
    let crews = CrewRepo::list(&state.pool).await?;
    Ok(views::render("crews/list.html", context! { crews })?)
}

fn form_page(
    crew: Option<&Crew>,
    values: BTreeMap<String, String>,
    error: Option<&str>,
) -> AppResult<Html<String>> {
    views::render("crews/form.html", context! { crew, values, error })
}

async fn new_form() -> PageResult<Html<String>> {
    Ok(form_page(None, BTreeMap::new(), None)?)
}

async fn insert(state: &AppState, form: &FormFields) -> AppResult<Crew> {
    let input = CreateCrew {
        name: form.text("name"),
    };
    validate(&input)?;
    let crew = CrewRepo::create(&state.pool, &input).await?;
    tracing::info!(crew_id = crew.id, name = %crew.name, "Crew created");
    Ok(crew)
}

async fn create(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = FormFields::from(pairs);
    match insert(&state, &form).await {
        Ok(crew) => Ok(Redirect::to(&format!("/crews/{}", crew.id)).into_response()),
        Err(err) => {
            let (status, message) = recoverable(err)?;
            Ok(with_status(status, form_page(None, form.values(), Some(&message))?))
        }
    }
}

async fn detail_page(state: &AppState, id: DbId, error: Option<&str>) -> AppResult<Html<String>> {
    let crew = ensure_crew_exists(state, id).await?;
    let members = CrewRepo::members(&state.pool, id).await?;
    let jobs = JobRepo::list_by_crew(&state.pool, id).await?;
    let available: Vec<_> = MemberRepo::list(&state.pool)
        .await?
        .into_iter()
        .filter(|m| !members.iter().any(|current| current.id == m.id))
        .collect();
    views::render(
        "crews/detail.html",
        context! { crew, members, jobs, available, error },
    )
}

async fn detail(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Html<String>> {
    Ok(detail_page(&state, id, None).await?)
}

async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> PageResult<Html<String>> {
    let crew = ensure_crew_exists(&state, id).await?;
    let values = FormValues::new().set("name", &crew.name).build();
    Ok(form_page(Some(&crew), values, None)?)
}

async fn save(state: &AppState, id: DbId, form: &FormFields) -> AppResult<Crew> {
    let input = UpdateCrew {
        name: Some(form.text("name")),
    };
    validate(&input)?;
    let crew = CrewRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "crew", id }))?;
    tracing::info!(crew_id = id, "Crew renamed");
    Ok(crew)
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = FormFields::from(pairs);
    match save(&state, id, &form).await {
        Ok(crew) => Ok(Redirect::to(&format!("/crews/{}", crew.id)).into_response()),
        Err(err) => {
            let (status, message) = recoverable(err)?;
            let crew = ensure_crew_exists(&state, id).await?;
            Ok(with_status(
                status,
                form_page(Some(&crew), form.values(), Some(&message))?,
            ))
        }
    }
}

async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Response> {
    if !CrewRepo::delete(&state.pool, id).await? {
        return Err(PageError::from(CoreError::NotFound { entity: "crew", id }));
    }
    tracing::info!(crew_id = id, "Crew deleted");
    Ok(Redirect::to("/crews").into_response())
}

async fn assign(state: &AppState, id: DbId, form: &FormFields) -> AppResult<()> {
    ensure_crew_exists(state, id).await?;
    let member_id = form.id("member_id")?;
    if MemberRepo::find_by_id(&state.pool, member_id).await?.is_none() {
        return Err(
            CoreError::Validation(format!("member_id: member {member_id} does not exist")).into(),
        );
    }
    if CrewRepo::add_member(&state.pool, id, member_id).await? {
        tracing::info!(crew_id = id, member_id, "Member added to crew");
    }
    Ok(())
}

async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = FormFields::from(pairs);
    match assign(&state, id, &form).await {
        Ok(()) => Ok(Redirect::to(&format!("/crews/{id}")).into_response()),
        Err(err) => {
            let (status, message) = recoverable(err)?;
            Ok(with_status(status, detail_page(&state, id, Some(&message)).await?))
        }
    }
}

async fn remove_member(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(DbId, DbId)>,
) -> PageResult<Response> {
    if CrewRepo::remove_member(&state.pool, id, member_id).await? {
        tracing::info!(crew_id = id, member_id, "Member removed from crew");
    }
    Ok(Redirect::to(&format!("/crews/{id}")).into_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/crews", get(list).post(create))
        .route("/crews/new", get(new_form))
        .route("/crews/{id}", get(detail))
        .route("/crews/{id}/edit", get(edit_form).post(update))
        .route("/crews/{id}/delete", post(delete))
        .route("/crews/{id}/members", post(add_member))
        .route("/crews/{id}/members/{member_id}/remove", post(remove_member))
}
