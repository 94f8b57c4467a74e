//! Server-side HTML rendering.
//!
//! Templates are compiled into the binary and loaded once into a shared
//! [`minijinja::Environment`]. Autoescaping applies to every `.html`
//! template.

use std::sync::LazyLock;

use axum::response::Html;
use landscaper_core::money::format_cents;
use minijinja::{Environment, Value};
use serde::Serialize;

use crate::error::AppResult;

macro_rules! templates {
    ($($name:literal),* $(,)?) => {
        &[$(($name, include_str!(concat!("../templates/", $name)))),*]
    };
}

const TEMPLATES: &[(&str, &str)] = templates![
    "base.html",
    "error.html",
    "home.html",
    "clients/list.html",
    "clients/form.html",
    "clients/detail.html",
    "crews/list.html",
    "crews/form.html",
    "crews/detail.html",
    "members/list.html",
    "members/form.html",
    "members/detail.html",
    "jobs/list.html",
    "jobs/form.html",
    "jobs/detail.html",
    "quotes/list.html",
    "quotes/form.html",
    "quotes/detail.html",
    "invoices/list.html",
    "invoices/detail.html",
    "invoices/pdf.html",
    "calendar.html",
    "reports.html",
];

static ENV: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    for (name, source) in TEMPLATES {
        if let Err(err) = env.add_template(name, source) {
            tracing::error!(template = name, error = %err, "Template failed to compile");
        }
    }
    env.add_filter("money", money);
    env.add_filter("humanize", humanize);
    env.add_filter("datetime", datetime);
    env
});

/// Render `name` with `ctx`.
pub fn render_html<S: Serialize>(name: &str, ctx: S) -> AppResult<String> {
    let template = ENV.get_template(name)?;
    Ok(template.render(ctx)?)
}

/// Render `name` with `ctx` as an HTML response body.
pub fn render<S: Serialize>(name: &str, ctx: S) -> AppResult<Html<String>> {
    render_html(name, ctx).map(Html)
}

/// `{{ cents | money }}` -> `1,234.56`. Missing values render empty.
fn money(value: Value) -> String {
    if value.is_undefined() || value.is_none() {
        return String::new();
    }
    i64::try_from(value.clone())
        .map(format_cents)
        .unwrap_or_else(|_| value.to_string())
}

/// `{{ "in_progress" | humanize }}` -> `In Progress`.
fn humanize(value: String) -> String {
    value
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// RFC 3339 timestamp -> `YYYY-MM-DD HH:MM` (UTC).
fn datetime(value: String) -> String {
    match chrono::DateTime::parse_from_rfc3339(&value) {
        Ok(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => value,
    }
}
