//! HTTP-level tests for quotes, line items and acceptance.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_client, delete, get, post_empty, post_json, put_json};
use sqlx::SqlitePool;

async fn create_quote(pool: &SqlitePool, client_id: i64) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/quotes",
        serde_json::json!({
            "client_id": client_id,
            "description": "Patio planting",
            "estimated_hours": 6.0,
            "line_items": [
                {"description": "Shrubs", "quantity": 4.0, "unit_price": 2_500},
                {"description": "Labor (hours)", "quantity": 6.0, "unit_price": 5_000},
            ],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_quote_computes_total(pool: SqlitePool) {
    let client_id = create_client(&pool, "Holly Gardens").await;
    let quote = create_quote(&pool, client_id).await;

    assert_eq!(quote["status"], "draft");
    assert_eq!(quote["total"], 10_000 + 30_000);
    assert_eq!(quote["line_items"].as_array().unwrap().len(), 2);
    assert_eq!(quote["line_items"][0]["line_total"], 10_000);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_quote_for_unknown_client_is_rejected(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/quotes",
        serde_json::json!({"client_id": 12, "description": "Sod"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_line_items_keep_total_in_sync(pool: SqlitePool) {
    let client_id = create_client(&pool, "Ivy Terrace").await;
    let quote = create_quote(&pool, client_id).await;
    let id = quote["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/quotes/{id}/items"),
        serde_json::json!({"description": "Mulch", "quantity": 2.0, "unit_price": 1_250}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let item_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/v1/quotes/{id}")).await).await;
    assert_eq!(json["data"]["total"], 42_500);

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/quotes/{id}/items/{item_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/v1/quotes/{id}")).await).await;
    assert_eq!(json["data"]["total"], 40_000);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_bad_line_item_is_rejected(pool: SqlitePool) {
    let client_id = create_client(&pool, "Juniper Walk").await;
    let quote = create_quote(&pool, client_id).await;
    let id = quote["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/quotes/{id}/items"),
        serde_json::json!({"description": "Stone", "quantity": 0.0, "unit_price": 100}),
    )
    .await;
    assert!(response.status().is_client_error());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_accept_creates_scheduled_job(pool: SqlitePool) {
    let client_id = create_client(&pool, "Laurel Bend").await;
    let quote = create_quote(&pool, client_id).await;
    let id = quote["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_empty(app, &format!("/api/v1/quotes/{id}/send")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "sent");

    let app = common::build_test_app(pool.clone());
    let response = post_empty(app, &format!("/api/v1/quotes/{id}/accept")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["quote"]["status"], "accepted");
    assert_eq!(json["data"]["job"]["status"], "scheduled");
    assert_eq!(json["data"]["job"]["client_id"], client_id);
    assert_eq!(json["data"]["job"]["description"], "Patio planting");
    let job_id = json["data"]["job"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["quote"]["job_id"], job_id);

    let app = common::build_test_app(pool.clone());
    let response = post_empty(app, &format!("/api/v1/quotes/{id}/accept")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "INVALID_TRANSITION");

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/v1/clients/{client_id}/jobs")).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_declined_quote_is_read_only(pool: SqlitePool) {
    let client_id = create_client(&pool, "Magnolia Rise").await;
    let quote = create_quote(&pool, client_id).await;
    let id = quote["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_empty(app, &format!("/api/v1/quotes/{id}/decline")).await;
    assert_eq!(body_json(response).await["data"]["status"], "declined");

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/quotes/{id}"),
        serde_json::json!({"description": "Changed"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let app = common::build_test_app(pool);
    let response = post_empty(app, &format!("/api/v1/quotes/{id}/accept")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_quote_status_filter(pool: SqlitePool) {
    let client_id = create_client(&pool, "Nettle Farm").await;
    let first = create_quote(&pool, client_id).await;
    create_quote(&pool, client_id).await;
    let id = first["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    post_empty(app, &format!("/api/v1/quotes/{id}/send")).await;

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/quotes?status=sent").await).await;
    let quotes = json["data"].as_array().unwrap();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0]["id"], id);
}
