//! Error surface of the external-collaborator boundary.
//!
//! Store and identity adapters reduce every failure to one of these;
//! interpretation of procedure text (where it happens at all) belongs to
//! the component that invoked the procedure.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by an external collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The call never produced a usable response (connect, timeout, TLS).
    #[error("backend unreachable: {0}")]
    Transport(String),

    /// The response arrived but could not be decoded into the expected shape.
    #[error("backend response malformed: {0}")]
    Decode(String),

    /// The backend rejected the operation; carries the raw upstream message
    /// verbatim so callers can key on its text.
    #[error("{0}")]
    Procedure(String),
}

impl StoreError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn procedure(msg: impl Into<String>) -> Self {
        Self::Procedure(msg.into())
    }
}
