//! Error type for repository actions that apply domain rules.
//!
//! Plain CRUD methods return `sqlx::Error` directly; lifecycle actions
//! (accepting a quote, completing a job, recording a payment) can also fail
//! on a business rule and return [`DbError`].

use landscaper_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    pub fn not_found(entity: &'static str, id: landscaper_core::types::DbId) -> Self {
        DbError::Core(CoreError::NotFound { entity, id })
    }
}
