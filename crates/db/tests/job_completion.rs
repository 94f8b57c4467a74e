//! Integration tests for completing jobs and the invoices it raises.

mod common;

use assert_matches::assert_matches;
use landscaper_core::error::CoreError;
use landscaper_core::invoice::InvoiceStatus;
use landscaper_core::job::{Actuals, JobStatus};
use landscaper_db::error::DbError;
use landscaper_db::models::invoice::CreateInvoice;
use landscaper_db::repositories::{InvoiceRepo, JobRepo};
use sqlx::SqlitePool;

use common::{date, new_job, seed_job};

#[sqlx::test(migrations = "./migrations")]
async fn test_complete_records_actuals_and_raises_invoice(pool: SqlitePool) {
    let job = seed_job(&pool, "Install pavers").await;
    JobRepo::start(&pool, job.id).await.unwrap();

    let done = JobRepo::complete(&pool, job.id, &Actuals { hours: 6.5, cost: 42_000 })
        .await
        .unwrap();
    assert_eq!(done.job.status, JobStatus::Complete);
    assert_eq!(done.job.actual_hours, Some(6.5));
    assert_eq!(done.job.actual_cost, Some(42_000));
    assert!(done.job.completed_at.is_some());

    let invoice = done.invoice.expect("completion raises an invoice");
    assert_eq!(invoice.status, InvoiceStatus::Unsent);
    assert_eq!(invoice.total, 42_000);
    assert_eq!(invoice.job_id, job.id);
    assert_eq!(invoice.amount_paid, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_completing_twice_is_already_completed(pool: SqlitePool) {
    let job = seed_job(&pool, "Prune roses").await;
    JobRepo::complete(&pool, job.id, &Actuals { hours: 1.0, cost: 8_000 })
        .await
        .unwrap();

    let again = JobRepo::complete(&pool, job.id, &Actuals { hours: 9.0, cost: 99_000 }).await;
    assert_matches!(again, Err(DbError::Core(CoreError::AlreadyCompleted)));

    let job = JobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Complete);
    assert_eq!(job.actual_cost, Some(8_000));
    let invoice = InvoiceRepo::find_by_job(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(invoice.total, 8_000);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_zero_cost_completion_raises_no_invoice(pool: SqlitePool) {
    let job = seed_job(&pool, "Warranty visit").await;
    let done = JobRepo::complete(&pool, job.id, &Actuals { hours: 0.5, cost: 0 })
        .await
        .unwrap();
    assert!(done.invoice.is_none());
    assert!(InvoiceRepo::find_by_job(&pool, job.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_existing_invoice_is_kept_on_completion(pool: SqlitePool) {
    let job = seed_job(&pool, "Deposit job").await;
    let deposit = InvoiceRepo::create_for_job(&pool, job.id, &CreateInvoice { total: 5_000 })
        .await
        .unwrap();

    let done = JobRepo::complete(&pool, job.id, &Actuals { hours: 2.0, cost: 20_000 })
        .await
        .unwrap();
    assert!(done.invoice.is_none());
    let invoice = InvoiceRepo::find_by_job(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(invoice.id, deposit.id);
    assert_eq!(invoice.total, 5_000);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cancelled_and_invalid_completions(pool: SqlitePool) {
    let job = seed_job(&pool, "Snow removal").await;

    assert_matches!(
        JobRepo::complete(&pool, job.id, &Actuals { hours: -2.0, cost: 100 }).await,
        Err(DbError::Core(CoreError::Validation(_)))
    );
    assert_eq!(
        JobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap().status,
        JobStatus::Scheduled
    );

    JobRepo::cancel(&pool, job.id).await.unwrap();
    assert_matches!(
        JobRepo::complete(&pool, job.id, &Actuals { hours: 1.0, cost: 100 }).await,
        Err(DbError::Core(CoreError::InvalidTransition(_)))
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_complete_jobs_cannot_be_edited(pool: SqlitePool) {
    let job = seed_job(&pool, "Stone wall").await;
    JobRepo::complete(&pool, job.id, &Actuals { hours: 3.0, cost: 0 })
        .await
        .unwrap();

    let edit = new_job(job.client_id, "Changed", date(2026, 12, 1));
    assert_matches!(
        JobRepo::update(&pool, job.id, &edit).await,
        Err(DbError::Core(CoreError::InvalidTransition(_)))
    );
}
