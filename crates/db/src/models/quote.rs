//! Quote and line item models.

use chrono::NaiveDate;
use landscaper_core::quote::QuoteStatus;
use landscaper_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::job::Job;

/// A row from the `quotes` table joined with the client name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quote {
    pub id: DbId,
    pub client_id: DbId,
    pub client_name: String,
    pub description: String,
    pub estimated_hours: Option<f64>,
    /// Sum of line item totals.
    pub total: Cents,
    #[sqlx(try_from = "String")]
    pub status: QuoteStatus,
    pub valid_until: Option<NaiveDate>,
    /// The job created when the quote was accepted.
    pub job_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `quote_line_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuoteLineItem {
    pub id: DbId,
    pub quote_id: DbId,
    pub description: String,
    pub quantity: f64,
    pub unit_price: Cents,
    pub line_total: Cents,
    pub created_at: Timestamp,
}

/// DTO for adding a line item to a draft quote.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLineItem {
    #[validate(length(min = 1, max = 500, message = "Description is required"))]
    pub description: String,
    pub quantity: f64,
    pub unit_price: Cents,
}

/// DTO for drafting a quote with its initial line items.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuote {
    pub client_id: DbId,
    #[validate(length(min = 1, max = 1000, message = "Description is required"))]
    pub description: String,
    #[validate(range(min = 0.0, message = "Estimated hours cannot be negative"))]
    pub estimated_hours: Option<f64>,
    pub valid_until: Option<NaiveDate>,
    #[serde(default)]
    pub line_items: Vec<CreateLineItem>,
}

/// DTO for editing a draft quote. Only provided fields change.
///
/// The nullable fields are doubly optional: absent leaves the stored value,
/// `Some(None)` (JSON `null`) clears it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateQuote {
    #[validate(length(min = 1, max = 1000, message = "Description is required"))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[validate(range(min = 0.0, message = "Estimated hours cannot be negative"))]
    pub estimated_hours: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub valid_until: Option<Option<NaiveDate>>,
}

/// Marks a field that appeared in the payload, even as `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// An accepted quote together with the job it produced.
#[derive(Debug, Clone, Serialize)]
pub struct AcceptedQuote {
    pub quote: Quote,
    pub job: Job,
}
