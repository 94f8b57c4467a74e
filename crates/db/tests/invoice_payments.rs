//! Integration tests for invoices, payments and status derivation.

mod common;

use assert_matches::assert_matches;
use landscaper_core::error::CoreError;
use landscaper_core::invoice::{InvoiceStatus, PaymentMethod};
use landscaper_db::error::DbError;
use landscaper_db::models::invoice::{CreateInvoice, RecordPayment};
use landscaper_db::repositories::{InvoiceRepo, JobRepo};
use sqlx::SqlitePool;

use common::{date, seed_job};

fn payment(amount: i64, method: PaymentMethod) -> RecordPayment {
    RecordPayment {
        amount,
        method,
        paid_on: date(2026, 10, 16),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payment_sequence_reaches_paid(pool: SqlitePool) {
    let job = seed_job(&pool, "Patio install").await;
    let invoice = InvoiceRepo::create_for_job(&pool, job.id, &CreateInvoice { total: 300 })
        .await
        .unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Unsent);

    let receipt = InvoiceRepo::record_payment(&pool, invoice.id, &payment(200, PaymentMethod::Cash))
        .await
        .unwrap();
    assert_eq!(receipt.invoice.status, InvoiceStatus::PartiallyPaid);
    assert_eq!(receipt.invoice.amount_paid, 200);
    assert_eq!(receipt.payment.method, PaymentMethod::Cash);
    assert!(receipt.invoice.paid_at.is_none());

    let receipt = InvoiceRepo::record_payment(&pool, invoice.id, &payment(100, PaymentMethod::Card))
        .await
        .unwrap();
    assert_eq!(receipt.invoice.status, InvoiceStatus::Paid);
    assert_eq!(receipt.invoice.balance(), 0);
    assert!(receipt.invoice.paid_at.is_some());

    let over = InvoiceRepo::record_payment(&pool, invoice.id, &payment(1, PaymentMethod::Cash)).await;
    assert_matches!(over, Err(DbError::Core(CoreError::InvalidAmount(_))));

    let invoice = InvoiceRepo::find_by_id(&pool, invoice.id).await.unwrap().unwrap();
    assert_eq!(invoice.amount_paid, 300);
    assert_eq!(InvoiceRepo::payments(&pool, invoice.id).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rejected_payments_leave_state_unchanged(pool: SqlitePool) {
    let job = seed_job(&pool, "Retaining wall").await;
    let invoice = InvoiceRepo::create_for_job(&pool, job.id, &CreateInvoice { total: 1_000 })
        .await
        .unwrap();

    for amount in [0, -50, 1_001] {
        let result =
            InvoiceRepo::record_payment(&pool, invoice.id, &payment(amount, PaymentMethod::Check))
                .await;
        assert_matches!(result, Err(DbError::Core(CoreError::InvalidAmount(_))));
    }

    let invoice = InvoiceRepo::find_by_id(&pool, invoice.id).await.unwrap().unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Unsent);
    assert_eq!(invoice.amount_paid, 0);
    assert!(InvoiceRepo::payments(&pool, invoice.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mark_sent_is_idempotent(pool: SqlitePool) {
    let job = seed_job(&pool, "Sprinkler repair").await;
    let invoice = InvoiceRepo::create_for_job(&pool, job.id, &CreateInvoice { total: 500 })
        .await
        .unwrap();

    let sent = InvoiceRepo::mark_sent(&pool, invoice.id).await.unwrap();
    assert_eq!(sent.status, InvoiceStatus::Sent);
    let first_sent_at = sent.sent_at.expect("sent_at stamped");

    let again = InvoiceRepo::mark_sent(&pool, invoice.id).await.unwrap();
    assert_eq!(again.status, InvoiceStatus::Sent);
    assert_eq!(again.sent_at, Some(first_sent_at));

    InvoiceRepo::record_payment(&pool, invoice.id, &payment(500, PaymentMethod::Other))
        .await
        .unwrap();
    assert_matches!(
        InvoiceRepo::mark_sent(&pool, invoice.id).await,
        Err(DbError::Core(CoreError::InvalidTransition(_)))
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_payment_recomputes_status(pool: SqlitePool) {
    let job = seed_job(&pool, "Tree removal").await;
    let invoice = InvoiceRepo::create_for_job(&pool, job.id, &CreateInvoice { total: 800 })
        .await
        .unwrap();
    InvoiceRepo::mark_sent(&pool, invoice.id).await.unwrap();
    let first = InvoiceRepo::record_payment(&pool, invoice.id, &payment(300, PaymentMethod::Cash))
        .await
        .unwrap();
    let second = InvoiceRepo::record_payment(&pool, invoice.id, &payment(500, PaymentMethod::Card))
        .await
        .unwrap();
    assert_eq!(second.invoice.status, InvoiceStatus::Paid);

    let invoice = InvoiceRepo::delete_payment(&pool, invoice.id, second.payment.id)
        .await
        .unwrap();
    assert_eq!(invoice.status, InvoiceStatus::PartiallyPaid);
    assert!(invoice.paid_at.is_none());

    let invoice = InvoiceRepo::delete_payment(&pool, invoice.id, first.payment.id)
        .await
        .unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Sent);
    assert_eq!(invoice.amount_paid, 0);

    assert_matches!(
        InvoiceRepo::delete_payment(&pool, invoice.id, first.payment.id).await,
        Err(DbError::Core(CoreError::NotFound { entity: "payment", .. }))
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_invoice_rules(pool: SqlitePool) {
    let job = seed_job(&pool, "Fence staining").await;

    assert_matches!(
        InvoiceRepo::create_for_job(&pool, job.id, &CreateInvoice { total: 0 }).await,
        Err(DbError::Core(CoreError::InvalidAmount(_)))
    );
    assert_matches!(
        InvoiceRepo::create_for_job(&pool, 999, &CreateInvoice { total: 100 }).await,
        Err(DbError::Core(CoreError::NotFound { entity: "job", id: 999 }))
    );

    InvoiceRepo::create_for_job(&pool, job.id, &CreateInvoice { total: 100 })
        .await
        .unwrap();
    assert_matches!(
        InvoiceRepo::create_for_job(&pool, job.id, &CreateInvoice { total: 200 }).await,
        Err(DbError::Core(CoreError::Conflict(_)))
    );

    let unsent = InvoiceRepo::list(&pool, Some(InvoiceStatus::Unsent)).await.unwrap();
    assert_eq!(unsent.len(), 1);
    assert_eq!(unsent[0].client_name, "Hartley Residence");
    assert!(InvoiceRepo::list(&pool, Some(InvoiceStatus::Paid))
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cancelled_job_cannot_be_invoiced(pool: SqlitePool) {
    let job = seed_job(&pool, "Snow clearing").await;
    JobRepo::cancel(&pool, job.id).await.unwrap();

    assert_matches!(
        InvoiceRepo::create_for_job(&pool, job.id, &CreateInvoice { total: 10_000 }).await,
        Err(DbError::Core(CoreError::InvalidTransition(_)))
    );
    assert!(InvoiceRepo::find_by_job(&pool, job.id).await.unwrap().is_none());
}
