//! Crew member screens.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use landscaper_core::error::CoreError;
use landscaper_core::types::DbId;
use landscaper_core::validation::validate;
use landscaper_db::models::member::{CreateMember, Member, UpdateMember};
use landscaper_db::repositories::{JobRepo, MemberRepo};
use minijinja::context;

use crate::error::{AppError, AppResult};
use crate::handlers::member::ensure_member_exists;
use crate::pages::forms::{FormFields, FormValues};
use crate::pages::{recoverable, with_status, PageError, PageResult};
use crate::state::AppState;
use crate::views;

async fn list(State(state): State<AppState>) -> PageResult<Html<String>> {
    let members = MemberRepo::list(&state.pool).await?;
    Ok(views::render("members/list.html", context! { members })?)
}

fn form_page(
    member: Option<&Member>,
    values: BTreeMap<String, String>,
    error: Option<&str>,
) -> AppResult<Html<String>> {
    views::render("members/form.html", context! { member, values, error })
}

async fn new_form() -> PageResult<Html<String>> {
    Ok(form_page(None, BTreeMap::new(), None)?)
}

async fn insert(state: &AppState, form: &FormFields) -> AppResult<Member> {
    let input = CreateMember {
        name: form.text("name"),
        phone: form.optional_text("phone"),
    };
    validate(&input)?;
    let member = MemberRepo::create(&state.pool, &input).await?;
    tracing::info!(member_id = member.id, name = %member.name, "Member created");
    Ok(member)
}

async fn create(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = FormFields::from(pairs);
    match insert(&state, &form).await {
        Ok(member) => Ok(Redirect::to(&format!("/members/{}", member.id)).into_response()),
        Err(err) => {
            let (status, message) = recoverable(err)?;
            Ok(with_status(status, form_page(None, form.values(), Some(&message))?))
        }
    }
}

async fn detail(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Html<String>> {
    let member = ensure_member_exists(&state, id).await?;
    let crews = MemberRepo::crews(&state.pool, id).await?;
    let jobs = JobRepo::list_by_member(&state.pool, id).await?;
    Ok(views::render(
        "members/detail.html",
        context! { member, crews, jobs },
    )?)
}

async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> PageResult<Html<String>> {
    let member = ensure_member_exists(&state, id).await?;
    let values = FormValues::new()
        .set("name", &member.name)
        .set_opt("phone", member.phone.as_ref())
        .build();
    Ok(form_page(Some(&member), values, None)?)
}

async fn save(state: &AppState, id: DbId, form: &FormFields) -> AppResult<Member> {
    let input = UpdateMember {
        name: Some(form.text("name")),
        phone: Some(form.text("phone")),
    };
    validate(&input)?;
    let member = MemberRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "member",
            id,
        }))?;
    tracing::info!(member_id = id, "Member updated");
    Ok(member)
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = FormFields::from(pairs);
    match save(&state, id, &form).await {
        Ok(member) => Ok(Redirect::to(&format!("/members/{}", member.id)).into_response()),
        Err(err) => {
            let (status, message) = recoverable(err)?;
            let member = ensure_member_exists(&state, id).await?;
            Ok(with_status(
                status,
                form_page(Some(&member), form.values(), Some(&message))?,
            ))
        }
    }
}

async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> PageResult<Response> {
    if !MemberRepo::delete(&state.pool, id).await? {
        return Err(PageError::from(CoreError::NotFound {
            entity: "member",
            id,
        }));
    }
    tracing::info!(member_id = id, "Member deleted");
    Ok(Redirect::to("/members").into_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/members", get(list).post(create))
        .route("/members/new", get(new_form))
        .route("/members/{id}", get(detail))
        .route("/members/{id}/edit", get(edit_form).post(update))
        .route("/members/{id}/delete", post(delete))
}
