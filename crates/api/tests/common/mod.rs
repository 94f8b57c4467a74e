//! Shared helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use landscaper_api::config::ServerConfig;
use landscaper_api::router::build_app_router;
use landscaper_api::state::AppState;
use landscaper_core::error::CoreError;
use landscaper_core::pdf::{PdfRenderer, UnavailablePdfRenderer};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        cors_origins: vec!["http://localhost:5050".to_string()],
        request_timeout_secs: 30,
        pdf_renderer: "wkhtmltopdf".to_string(),
        google_maps_api_key: None,
    }
}

/// Renderer that wraps the HTML in a fake PDF header.
pub struct FakePdfRenderer;

#[async_trait]
impl PdfRenderer for FakePdfRenderer {
    fn is_available(&self) -> bool {
        true
    }

    async fn render(&self, html: &str) -> Result<Vec<u8>, CoreError> {
        let mut bytes = b"%PDF-1.4\n".to_vec();
        bytes.extend_from_slice(html.as_bytes());
        Ok(bytes)
    }
}

/// Build the full application router with no PDF renderer installed.
pub fn build_test_app(pool: SqlitePool) -> Router {
    build_test_app_with(pool, Arc::new(UnavailablePdfRenderer::default()), test_config())
}

/// Build the full application router with the fake PDF renderer.
pub fn build_test_app_with_pdf(pool: SqlitePool) -> Router {
    build_test_app_with(pool, Arc::new(FakePdfRenderer), test_config())
}

pub fn build_test_app_with(
    pool: SqlitePool,
    pdf: Arc<dyn PdfRenderer>,
    config: ServerConfig,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        pdf,
    };
    build_app_router(state, &config)
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::delete(uri).body(Body::empty()).unwrap()).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::PUT, uri, body).await
}

/// POST with no body, for lifecycle actions.
pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::post(uri).body(Body::empty()).unwrap()).await
}

/// POST an urlencoded form. Pairs may repeat keys.
pub async fn post_form(app: Router, uri: &str, fields: &[(&str, &str)]) -> Response<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            b' ' => "+".to_string(),
            other => format!("%{other:02X}"),
        })
        .collect()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// `Location` header of a redirect.
pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get("location")
        .expect("redirect without location")
        .to_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Seed helpers (through the API)
// ---------------------------------------------------------------------------

/// Create a client and return its id.
pub async fn create_client(pool: &SqlitePool, name: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/clients",
        serde_json::json!({"name": name, "address": "12 Elm St, Springfield"}),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Schedule a job for `client_id` and return its id.
pub async fn create_job(pool: &SqlitePool, client_id: i64, date: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/jobs",
        serde_json::json!({
            "client_id": client_id,
            "description": "Weekly mowing",
            "scheduled_date": date,
            "estimated_hours": 2.0,
            "estimated_cost": 12_000,
        }),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create an invoice for `job_id` through `/jobs/{id}/invoice`.
pub async fn create_invoice(pool: &SqlitePool, job_id: i64, total: i64) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/jobs/{job_id}/invoice"),
        serde_json::json!({"total": total}),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
