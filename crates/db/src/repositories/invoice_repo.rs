//! Repository for the `invoices` and `payments` tables.
//!
//! An invoice's status is never written directly by callers: every payment
//! change recomputes it from the total, the paid sum and the send state.

use chrono::Utc;
use landscaper_core::error::CoreError;
use landscaper_core::invoice::{
    derive_status, validate_payment, validate_total, InvoiceStatus, SendOutcome,
};
use landscaper_core::job::JobStatus;
use landscaper_core::types::{Cents, DbId};
use sqlx::{Sqlite, SqliteExecutor, SqlitePool, Transaction};

use crate::error::{DbError, DbResult};
use crate::models::invoice::{CreateInvoice, Invoice, Payment, PaymentReceipt, RecordPayment};

/// Invoices with their paid sum and job/client context.
const SELECT_INVOICES: &str = "SELECT i.id, i.job_id, j.description AS job_description,
        j.client_id, c.name AS client_name, i.total,
        COALESCE((SELECT SUM(p.amount) FROM payments p WHERE p.invoice_id = i.id), 0) AS amount_paid,
        i.status, i.sent_at, i.paid_at, i.created_at, i.updated_at
     FROM invoices i
     JOIN jobs j ON j.id = i.job_id
     JOIN clients c ON c.id = j.client_id";

const PAYMENT_COLUMNS: &str = "id, invoice_id, amount, method, paid_on, created_at";

/// Provides invoice and payment operations.
pub struct InvoiceRepo;

impl InvoiceRepo {
    /// Raise an Unsent invoice for a job that has none.
    pub async fn create_for_job(
        pool: &SqlitePool,
        job_id: DbId,
        input: &CreateInvoice,
    ) -> DbResult<Invoice> {
        validate_total(input.total)?;

        let mut tx = pool.begin().await?;
        let status: Option<String> = sqlx::query_scalar("SELECT status FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(status) = status else {
            return Err(DbError::not_found("job", job_id));
        };
        status.parse::<JobStatus>()?.ensure_invoiceable()?;
        if Self::find_by_job(&mut *tx, job_id).await?.is_some() {
            return Err(DbError::Core(CoreError::Conflict(format!(
                "Job {job_id} already has an invoice"
            ))));
        }

        let id = Self::insert_unsent(&mut tx, job_id, input.total).await?;
        let invoice = Self::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("invoice", id))?;
        tx.commit().await?;

        tracing::info!(invoice_id = id, job_id, total = input.total, "Invoice created");
        Ok(invoice)
    }

    /// Insert an Unsent invoice inside an existing transaction.
    pub(crate) async fn insert_unsent(
        tx: &mut Transaction<'_, Sqlite>,
        job_id: DbId,
        total: Cents,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO invoices (job_id, total, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $4)
             RETURNING id",
        )
        .bind(job_id)
        .bind(total)
        .bind(InvoiceStatus::Unsent.as_str())
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await
    }

    /// Find an invoice by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Invoice>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!("{SELECT_INVOICES} WHERE i.id = $1");
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// The invoice raised for a job, if any.
    pub async fn find_by_job<'e, E>(
        executor: E,
        job_id: DbId,
    ) -> Result<Option<Invoice>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!("{SELECT_INVOICES} WHERE i.job_id = $1");
        sqlx::query_as::<_, Invoice>(&query)
            .bind(job_id)
            .fetch_optional(executor)
            .await
    }

    /// List invoices, newest first, optionally filtered by status.
    pub async fn list(
        pool: &SqlitePool,
        status: Option<InvoiceStatus>,
    ) -> Result<Vec<Invoice>, sqlx::Error> {
        let query = format!(
            "{SELECT_INVOICES} WHERE ($1 IS NULL OR i.status = $1) ORDER BY i.created_at DESC, i.id DESC"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(status.map(InvoiceStatus::as_str))
            .fetch_all(pool)
            .await
    }

    /// Delete an invoice and its payments. Returns `true` if a row was
    /// removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark an invoice as sent. Repeating on a Sent invoice changes nothing;
    /// Partially Paid and Paid invoices are refused.
    pub async fn mark_sent(pool: &SqlitePool, id: DbId) -> DbResult<Invoice> {
        let mut tx = pool.begin().await?;
        let invoice = Self::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("invoice", id))?;

        match invoice.status.mark_sent()? {
            SendOutcome::AlreadySent => {
                tracing::debug!(invoice_id = id, "Invoice already sent");
                return Ok(invoice);
            }
            SendOutcome::Sent => {}
        }

        let now = Utc::now();
        sqlx::query("UPDATE invoices SET status = $2, sent_at = $3, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(InvoiceStatus::Sent.as_str())
            .bind(now)
            .execute(&mut *tx)
            .await?;
        let invoice = Self::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("invoice", id))?;
        tx.commit().await?;

        tracing::info!(invoice_id = id, "Invoice marked sent");
        Ok(invoice)
    }

    // -----------------------------------------------------------------------
    // Payments
    // -----------------------------------------------------------------------

    /// Payments on an invoice, oldest first.
    pub async fn payments<'e, E>(executor: E, invoice_id: DbId) -> Result<Vec<Payment>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE invoice_id = $1 ORDER BY paid_on, id"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(invoice_id)
            .fetch_all(executor)
            .await
    }

    /// Record a payment and recompute the invoice status.
    ///
    /// Fails with `InvalidAmount`, leaving the invoice untouched, when the
    /// amount is not positive or would push the paid sum past the total.
    pub async fn record_payment(
        pool: &SqlitePool,
        invoice_id: DbId,
        input: &RecordPayment,
    ) -> DbResult<PaymentReceipt> {
        let mut tx = pool.begin().await?;
        let invoice = Self::find_by_id(&mut *tx, invoice_id)
            .await?
            .ok_or_else(|| DbError::not_found("invoice", invoice_id))?;
        let new_paid = validate_payment(invoice.total, invoice.amount_paid, input.amount)?;

        let query = format!(
            "INSERT INTO payments (invoice_id, amount, method, paid_on, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PAYMENT_COLUMNS}"
        );
        let payment = sqlx::query_as::<_, Payment>(&query)
            .bind(invoice_id)
            .bind(input.amount)
            .bind(input.method.as_str())
            .bind(input.paid_on)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

        let invoice = Self::apply_paid_sum(&mut tx, &invoice, new_paid).await?;
        tx.commit().await?;

        tracing::info!(
            invoice_id,
            payment_id = payment.id,
            amount = input.amount,
            method = %input.method,
            status = %invoice.status,
            "Payment recorded",
        );
        Ok(PaymentReceipt { invoice, payment })
    }

    /// Remove a payment and recompute the invoice status.
    pub async fn delete_payment(
        pool: &SqlitePool,
        invoice_id: DbId,
        payment_id: DbId,
    ) -> DbResult<Invoice> {
        let mut tx = pool.begin().await?;
        let invoice = Self::find_by_id(&mut *tx, invoice_id)
            .await?
            .ok_or_else(|| DbError::not_found("invoice", invoice_id))?;

        let amount: Option<Cents> = sqlx::query_scalar(
            "DELETE FROM payments WHERE id = $1 AND invoice_id = $2 RETURNING amount",
        )
        .bind(payment_id)
        .bind(invoice_id)
        .fetch_optional(&mut *tx)
        .await?;
        let amount = amount.ok_or_else(|| DbError::not_found("payment", payment_id))?;

        let invoice = Self::apply_paid_sum(&mut tx, &invoice, invoice.amount_paid - amount).await?;
        tx.commit().await?;

        tracing::info!(invoice_id, payment_id, amount, status = %invoice.status, "Payment deleted");
        Ok(invoice)
    }

    /// Write the status implied by `paid`, stamping `paid_at` on reaching
    /// Paid and clearing it otherwise.
    async fn apply_paid_sum(
        tx: &mut Transaction<'_, Sqlite>,
        invoice: &Invoice,
        paid: Cents,
    ) -> DbResult<Invoice> {
        let status = derive_status(invoice.total, paid, invoice.sent_at.is_some());
        let now = Utc::now();
        let paid_at = match (status, invoice.paid_at) {
            (InvoiceStatus::Paid, Some(existing)) => Some(existing),
            (InvoiceStatus::Paid, None) => Some(now),
            _ => None,
        };

        sqlx::query("UPDATE invoices SET status = $2, paid_at = $3, updated_at = $4 WHERE id = $1")
            .bind(invoice.id)
            .bind(status.as_str())
            .bind(paid_at)
            .bind(now)
            .execute(&mut **tx)
            .await?;
        Self::find_by_id(&mut **tx, invoice.id)
            .await?
            .ok_or_else(|| DbError::not_found("invoice", invoice.id))
    }
}
