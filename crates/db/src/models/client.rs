//! Client entity model and DTOs.

use landscaper_core::types::{DbId, Timestamp};
use landscaper_core::validation::non_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidateEmail, ValidationError};

/// A row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClient {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "Email address is not valid"))]
    pub email: Option<String>,
    pub notes: Option<String>,
}

impl CreateClient {
    /// Trim text fields and drop blank optional ones.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            address: non_blank(self.address.clone()),
            phone: non_blank(self.phone.clone()),
            email: non_blank(self.email.clone()),
            notes: non_blank(self.notes.clone()),
        }
    }
}

/// DTO for updating a client. Only provided fields change.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateClient {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// `Some("")` clears the stored address.
    #[validate(custom(function = "blank_or_email"))]
    pub email: Option<String>,
    pub notes: Option<String>,
}

fn blank_or_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email").with_message("Email address is not valid".into()))
}

impl UpdateClient {
    /// Trim every provided field. Blank optional fields stay `Some("")` so
    /// they clear the stored value.
    pub fn normalized(&self) -> Self {
        let trim = |v: &Option<String>| v.as_ref().map(|s| s.trim().to_string());
        Self {
            name: trim(&self.name),
            address: trim(&self.address),
            phone: trim(&self.phone),
            email: trim(&self.email),
            notes: trim(&self.notes),
        }
    }
}
