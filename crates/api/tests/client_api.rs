//! HTTP-level tests for clients, crews and members.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_client, create_job, delete, get, post_json, put_json};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_client_returns_201(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/clients",
        serde_json::json!({"name": "  Hazel Park  ", "email": "hazel@example.com", "phone": ""}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Hazel Park");
    assert_eq!(json["data"]["email"], "hazel@example.com");
    assert!(json["data"]["phone"].is_null());
    assert!(json["data"]["id"].is_number());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_client_requires_name(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/clients", serde_json::json!({"name": ""})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("Name is required"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_client(pool: SqlitePool) {
    let id = create_client(&pool, "Birch Lane").await;

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/clients/{id}"),
        serde_json::json!({"notes": "Gate code 4411"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/v1/clients/{id}")).await).await;
    assert_eq!(json["data"]["name"], "Birch Lane");
    assert_eq!(json["data"]["notes"], "Gate code 4411");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_missing_client_returns_404(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/clients/999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_client_with_jobs_cannot_be_deleted(pool: SqlitePool) {
    let id = create_client(&pool, "Aspen Court").await;
    create_job(&pool, id, "2026-10-20").await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/clients/{id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/v1/clients/{id}/jobs")).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_client_without_jobs(pool: SqlitePool) {
    let id = create_client(&pool, "Cedar Row").await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/clients/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/v1/clients/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Crews and members
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_crew_membership(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone());
    let crew = body_json(post_json(app, "/api/v1/crews", serde_json::json!({"name": "North"})).await).await;
    let crew_id = crew["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let member = body_json(
        post_json(app, "/api/v1/members", serde_json::json!({"name": "Rosa", "phone": "555-0100"})).await,
    )
    .await;
    let member_id = member["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/crews/{crew_id}/members"),
        serde_json::json!({"member_id": member_id}),
    )
    .await;
    assert!(response.status().is_success());

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/v1/crews/{crew_id}/members")).await).await;
    assert_eq!(json["data"][0]["name"], "Rosa");

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/v1/members/{member_id}/crews")).await).await;
    assert_eq!(json["data"][0]["name"], "North");

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/crews/{crew_id}/members/{member_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/v1/crews/{crew_id}/members")).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_adding_unknown_member_to_crew_fails(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone());
    let crew = body_json(post_json(app, "/api/v1/crews", serde_json::json!({"name": "South"})).await).await;
    let crew_id = crew["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/crews/{crew_id}/members"),
        serde_json::json!({"member_id": 404}),
    )
    .await;
    assert!(response.status().is_client_error());
}
