//! Read models for the dashboard and reports.

use chrono::NaiveDate;
use landscaper_core::invoice::InvoiceStatus;
use landscaper_core::types::{Cents, DbId};
use serde::Serialize;
use sqlx::FromRow;

/// A completed job whose invoice still has a balance due.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UnpaidJob {
    pub job_id: DbId,
    pub description: String,
    pub client_id: DbId,
    pub client_name: String,
    pub scheduled_date: NaiveDate,
    pub invoice_id: DbId,
    #[sqlx(try_from = "String")]
    pub invoice_status: InvoiceStatus,
    pub total: Cents,
    pub amount_paid: Cents,
    pub balance: Cents,
}

/// Headline numbers for the home page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub client_count: i64,
    pub scheduled_jobs: i64,
    pub in_progress_jobs: i64,
    pub completed_jobs: i64,
    pub revenue_this_month: Cents,
    pub revenue_this_year: Cents,
    pub unpaid_invoices: i64,
    pub outstanding_balance: Cents,
    pub quotes_sent: i64,
    pub quotes_accepted: i64,
}
