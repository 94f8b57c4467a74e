//! Read-only aggregations for the dashboard and reports screen.

use chrono::{Datelike, NaiveDate};
use landscaper_core::calendar::CalendarMonth;
use landscaper_core::error::CoreError;
use landscaper_core::invoice::InvoiceStatus;
use landscaper_core::job::JobStatus;
use landscaper_core::quote::QuoteStatus;
use landscaper_core::reporting::{jobs_by_status, revenue_by_month, DateRange, MonthlyRevenue, StatusCount};
use landscaper_core::types::Cents;
use sqlx::SqlitePool;

use crate::error::DbResult;
use crate::models::report::{DashboardSummary, UnpaidJob};

/// Provides reporting queries. Nothing here writes.
pub struct ReportRepo;

impl ReportRepo {
    /// `(paid_on, amount)` for every payment dated inside `range`.
    pub async fn payments_between(
        pool: &SqlitePool,
        range: DateRange,
    ) -> Result<Vec<(NaiveDate, Cents)>, sqlx::Error> {
        sqlx::query_as::<_, (NaiveDate, Cents)>(
            "SELECT paid_on, amount FROM payments
             WHERE paid_on BETWEEN $1 AND $2
             ORDER BY paid_on, id",
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_all(pool)
        .await
    }

    /// Payments collected per calendar month within `range`.
    pub async fn revenue_by_month(
        pool: &SqlitePool,
        range: DateRange,
    ) -> Result<Vec<MonthlyRevenue>, sqlx::Error> {
        let payments = Self::payments_between(pool, range).await?;
        Ok(revenue_by_month(payments, range))
    }

    /// Job counts for every status, zero-filled.
    pub async fn jobs_by_status(pool: &SqlitePool) -> Result<Vec<StatusCount>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM jobs GROUP BY status",
        )
        .fetch_all(pool)
        .await?;

        let counts = rows
            .into_iter()
            .map(|(status, count)| Ok((JobStatus::try_from(status)?, count)))
            .collect::<Result<Vec<_>, CoreError>>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(jobs_by_status(counts))
    }

    /// Jobs whose invoice is not yet Paid, oldest first.
    pub async fn unpaid_jobs(pool: &SqlitePool) -> Result<Vec<UnpaidJob>, sqlx::Error> {
        sqlx::query_as::<_, UnpaidJob>(
            "SELECT j.id AS job_id, j.description, j.client_id, c.name AS client_name,
                j.scheduled_date, i.id AS invoice_id, i.status AS invoice_status, i.total,
                COALESCE(p.paid, 0) AS amount_paid,
                i.total - COALESCE(p.paid, 0) AS balance
             FROM invoices i
             JOIN jobs j ON j.id = i.job_id
             JOIN clients c ON c.id = j.client_id
             LEFT JOIN (
                SELECT invoice_id, SUM(amount) AS paid FROM payments GROUP BY invoice_id
             ) p ON p.invoice_id = i.id
             WHERE i.status <> $1
             ORDER BY j.scheduled_date, j.id",
        )
        .bind(InvoiceStatus::Paid.as_str())
        .fetch_all(pool)
        .await
    }

    /// Headline numbers for the home page as of `today`.
    pub async fn dashboard(pool: &SqlitePool, today: NaiveDate) -> DbResult<DashboardSummary> {
        let month = CalendarMonth::containing(today)?;
        let this_month = DateRange::new(month.first_day(), month.last_day())?;
        let this_year = DateRange::new(
            CalendarMonth::normalized(today.year(), 1)?.first_day(),
            CalendarMonth::normalized(today.year(), 12)?.last_day(),
        )?;

        let client_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(pool)
            .await?;

        let status_counts = Self::jobs_by_status(pool).await?;
        let count_of = |status: JobStatus| {
            status_counts
                .iter()
                .find(|c| c.status == status)
                .map_or(0, |c| c.count)
        };

        let revenue_between = |range: DateRange| async move {
            sqlx::query_scalar::<_, Cents>(
                "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE paid_on BETWEEN $1 AND $2",
            )
            .bind(range.from)
            .bind(range.to)
            .fetch_one(pool)
            .await
        };
        let revenue_this_month = revenue_between(this_month).await?;
        let revenue_this_year = revenue_between(this_year).await?;

        let unpaid = Self::unpaid_jobs(pool).await?;

        let quote_count = |status: QuoteStatus| async move {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quotes WHERE status = $1")
                .bind(status.as_str())
                .fetch_one(pool)
                .await
        };

        Ok(DashboardSummary {
            client_count,
            scheduled_jobs: count_of(JobStatus::Scheduled),
            in_progress_jobs: count_of(JobStatus::InProgress),
            completed_jobs: count_of(JobStatus::Complete),
            revenue_this_month,
            revenue_this_year,
            unpaid_invoices: unpaid.len() as i64,
            outstanding_balance: unpaid.iter().map(|u| u.balance).sum(),
            quotes_sent: quote_count(QuoteStatus::Sent).await?,
            quotes_accepted: quote_count(QuoteStatus::Accepted).await?,
        })
    }
}
