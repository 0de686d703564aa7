//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Resource already exists: {resource}")]
    Conflict { resource: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("{service} unavailable: {message}")]
    Upstream { service: String, message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    /// Shorthand for storage/driver failures
    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    /// Shorthand for third-party failures (identity providers, SMS transports)
    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    /// True for errors that mean "the caller is not authenticated"
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            DomainError::Unauthorized
                | DomainError::Token(_)
                | DomainError::Auth(AuthError::InvalidCredential { .. })
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
