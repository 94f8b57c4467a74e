//! Crew entity model and DTOs.

use landscaper_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `crews` table with its member count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Crew {
    pub id: DbId,
    pub name: String,
    pub member_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or renaming a crew.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCrew {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
}

/// DTO for updating a crew.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCrew {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: Option<String>,
}
