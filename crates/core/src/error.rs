//! Application error model.
//!
//! Every component-level failure is folded into one of these kinds before
//! it reaches the HTTP boundary; the API layer owns the final response
//! shaping and never sees anything else.

use thiserror::Error;

/// Result type used across the service layer.
pub type AppResult<T> = Result<T, AppError>;

/// Classified application failure.
///
/// The first four kinds are *operational*: expected outcomes of normal use
/// whose message is safe to show to a caller. `Internal` covers everything
/// else (transport failures, unrecognized upstream errors) and carries the
/// raw detail for server-side logs only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Missing or invalid credential.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated, but the role does not permit the action.
    #[error("{0}")]
    Forbidden(String),

    /// Malformed input or a business-rule violation.
    #[error("{0}")]
    Validation(String),

    /// A requested entity does not exist (or is not visible to the caller).
    #[error("{0}")]
    NotFound(String),

    /// Unexpected failure, including unrecognized upstream error text.
    #[error("{0}")]
    Internal(String),
}

/// Discriminant-only view of [`AppError`], used where the message is not
/// needed (tests, metrics).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    Validation,
    NotFound,
    Internal,
}

impl AppError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Internal(_) => 500,
        }
    }

    /// Operational errors may expose their message to callers; anything
    /// else gets a generic body outside development mode.
    pub fn is_operational(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::Validation(m)
            | Self::NotFound(m)
            | Self::Internal(m) => m,
        }
    }
}

impl From<crate::store::StoreError> for AppError {
    /// A store failure that nobody interpreted is unexpected by definition.
    fn from(err: crate::store::StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(AppError::unauthorized("x").status_code(), 401);
        assert_eq!(AppError::forbidden("x").status_code(), 403);
        assert_eq!(AppError::validation("x").status_code(), 400);
        assert_eq!(AppError::not_found("x").status_code(), 404);
        assert_eq!(AppError::internal("x").status_code(), 500);
    }

    #[test]
    fn only_internal_is_non_operational() {
        assert!(AppError::validation("x").is_operational());
        assert!(AppError::not_found("x").is_operational());
        assert!(!AppError::internal("x").is_operational());
    }

    #[test]
    fn uninterpreted_store_errors_become_internal() {
        let err: AppError = crate::store::StoreError::Transport("timed out".into()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
