use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The operation requires a logged-in user.
    #[error("unauthenticated")]
    Unauthenticated,
    /// Requested resource was not found, or belongs to someone else.
    #[error("not found")]
    NotFound,
    /// Submitted data failed validation.
    #[error("{0}")]
    Validation(String),
    /// The write collides with an existing record.
    #[error("{0}")]
    Conflict(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
