//! Job task model.

use landscaper_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub job_id: DbId,
    pub description: String,
    pub completed: bool,
    pub created_at: Timestamp,
}

/// DTO for adding a task to a job.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 500, message = "Description is required"))]
    pub description: String,
}
