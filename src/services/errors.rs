use thiserror::Error;

use crate::repository::errors::RepositoryError;

/// Result type returned by service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors reported to the HTTP layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or invalid credentials.
    #[error("authentication credentials were not provided or are invalid")]
    Unauthorized,
    /// The record does not exist or belongs to another user.
    #[error("not found")]
    NotFound,
    /// The submitted payload failed validation.
    #[error("{0}")]
    Form(String),
    /// The write collides with an existing record.
    #[error("a record with the same name already exists")]
    Conflict,
    /// Unexpected failure; details are logged, not returned to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ConstraintViolation(_) => ServiceError::Conflict,
            other => ServiceError::Internal(other.to_string()),
        }
    }
}
