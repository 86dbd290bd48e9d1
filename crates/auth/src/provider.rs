//! Identity-provider contract.
//!
//! The provider is an external service holding the credential store and
//! issuing opaque bearer tokens; this layer never inspects a token, it
//! only forwards it for resolution. Adapters live in `videoclub-infra`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use videoclub_core::{limits::messages, AppError};

use crate::identity::Identity;

/// Tokens issued by the provider for an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of a sign-up. Some providers withhold the session until the
/// email is confirmed, so it is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub user: Identity,
    pub session: Option<Session>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Wrong email/password combination.
    #[error("Credenciales inválidas")]
    InvalidCredentials,

    /// The presented bearer token did not resolve to a user.
    #[error("Token inválido o expirado")]
    InvalidToken,

    /// The provider rejected the request (e.g. email already registered);
    /// carries the provider's message.
    #[error("{0}")]
    Rejected(String),

    #[error("identity provider unreachable: {0}")]
    Transport(String),

    #[error("identity provider response malformed: {0}")]
    Decode(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken => {
                AppError::unauthorized(err.to_string())
            }
            AuthError::Rejected(msg) => AppError::validation(msg),
            AuthError::Transport(_) | AuthError::Decode(_) => {
                tracing::error!(error = %err, "identity provider failure");
                AppError::internal(messages::SERVER_ERROR)
            }
        }
    }
}

/// External identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a user with the default `user` role in its metadata.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<SignUpOutcome, AuthError>;

    /// Password sign-in; returns the identity and its session tokens.
    async fn sign_in(&self, email: &str, password: &str) -> Result<(Identity, Session), AuthError>;

    /// Invalidate the presented token.
    async fn sign_out(&self, token: &str) -> Result<(), AuthError>;

    /// Resolve a bearer token into an identity.
    async fn resolve(&self, token: &str) -> Result<Identity, AuthError>;
}
