//! Invoice and payment models.

use chrono::NaiveDate;
use landscaper_core::invoice::{self, InvoiceStatus, PaymentMethod};
use landscaper_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `invoices` table with its paid sum and job context.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Invoice {
    pub id: DbId,
    pub job_id: DbId,
    pub job_description: String,
    pub client_id: DbId,
    pub client_name: String,
    pub total: Cents,
    pub amount_paid: Cents,
    #[sqlx(try_from = "String")]
    pub status: InvoiceStatus,
    pub sent_at: Option<Timestamp>,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Invoice {
    pub fn balance(&self) -> Cents {
        invoice::balance(self.total, self.amount_paid)
    }
}

/// A row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub invoice_id: DbId,
    pub amount: Cents,
    #[sqlx(try_from = "String")]
    pub method: PaymentMethod,
    pub paid_on: NaiveDate,
    pub created_at: Timestamp,
}

/// DTO for invoicing a job manually.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoice {
    pub total: Cents,
}

/// DTO for recording a payment against an invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPayment {
    pub amount: Cents,
    pub method: PaymentMethod,
    pub paid_on: NaiveDate,
}

/// The invoice after a payment change, with the payment involved.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub invoice: Invoice,
    pub payment: Payment,
}
