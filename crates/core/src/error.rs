use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Job is already complete")]
    AlreadyCompleted,

    #[error("Export unavailable: {0}")]
    UnavailableExport(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
