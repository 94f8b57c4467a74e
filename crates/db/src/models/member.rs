//! Crew member entity model and DTOs.

use landscaper_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: DbId,
    pub name: String,
    pub phone: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a member.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMember {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    pub phone: Option<String>,
}

/// DTO for updating a member. Only provided fields change.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMember {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: Option<String>,
    pub phone: Option<String>,
}
