//! Job entity model and DTOs.

use chrono::NaiveDate;
use landscaper_core::job::JobStatus;
use landscaper_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `jobs` table joined with its client and crew names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub client_id: DbId,
    pub client_name: String,
    pub crew_id: Option<DbId>,
    pub crew_name: Option<String>,
    pub description: String,
    pub scheduled_date: NaiveDate,
    pub estimated_hours: Option<f64>,
    pub estimated_cost: Option<Cents>,
    pub actual_hours: Option<f64>,
    pub actual_cost: Option<Cents>,
    #[sqlx(try_from = "String")]
    pub status: JobStatus,
    pub completed_at: Option<Timestamp>,
    pub on_my_way_sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for scheduling a job.
///
/// Jobs are edited by full replacement, so the same shape serves as
/// [`UpdateJob`]. `crew_id` and `member_ids` replace the stored assignment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateJob {
    pub client_id: DbId,
    pub crew_id: Option<DbId>,
    #[validate(length(min = 1, max = 1000, message = "Description is required"))]
    pub description: String,
    pub scheduled_date: NaiveDate,
    #[validate(range(min = 0.0, message = "Estimated hours cannot be negative"))]
    pub estimated_hours: Option<f64>,
    #[validate(range(min = 0, message = "Estimated cost cannot be negative"))]
    pub estimated_cost: Option<Cents>,
    #[serde(default)]
    pub member_ids: Vec<DbId>,
}

pub type UpdateJob = CreateJob;

/// Outcome of completing a job: the frozen job and the invoice generated
/// for it, if any.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedJob {
    pub job: Job,
    pub invoice: Option<crate::models::invoice::Invoice>,
}
