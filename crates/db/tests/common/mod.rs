//! Shared fixtures for repository integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use landscaper_db::models::client::{Client, CreateClient};
use landscaper_db::models::job::{CreateJob, Job};
use landscaper_db::models::quote::{CreateLineItem, CreateQuote};
use landscaper_db::repositories::{ClientRepo, JobRepo};
use sqlx::SqlitePool;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn new_client(name: &str) -> CreateClient {
    CreateClient {
        name: name.to_string(),
        address: Some("12 Elm Street".to_string()),
        phone: None,
        email: None,
        notes: None,
    }
}

pub fn new_job(client_id: i64, description: &str, scheduled_date: NaiveDate) -> CreateJob {
    CreateJob {
        client_id,
        crew_id: None,
        description: description.to_string(),
        scheduled_date,
        estimated_hours: Some(3.0),
        estimated_cost: Some(25_000),
        member_ids: Vec::new(),
    }
}

pub fn line_item(description: &str, quantity: f64, unit_price: i64) -> CreateLineItem {
    CreateLineItem {
        description: description.to_string(),
        quantity,
        unit_price,
    }
}

pub fn new_quote(client_id: i64, line_items: Vec<CreateLineItem>) -> CreateQuote {
    CreateQuote {
        client_id,
        description: "Spring cleanup".to_string(),
        estimated_hours: Some(4.0),
        valid_until: None,
        line_items,
    }
}

pub async fn seed_client(pool: &SqlitePool, name: &str) -> Client {
    ClientRepo::create(pool, &new_client(name)).await.unwrap()
}

pub async fn seed_job(pool: &SqlitePool, description: &str) -> Job {
    let client = seed_client(pool, "Hartley Residence").await;
    JobRepo::create(pool, &new_job(client.id, description, date(2026, 10, 20)))
        .await
        .unwrap()
}
