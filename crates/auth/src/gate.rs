//! Pure role-gate policy.
//!
//! - No IO
//! - No panics
//! - The HTTP layer translates [`GateError`] into 401/403 responses.

use thiserror::Error;

use crate::{identity::Identity, role::Role};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    /// No identity attached to the request. On a correctly-ordered
    /// middleware chain this cannot happen; treat it as unauthenticated.
    #[error("no identity present")]
    Unauthenticated,

    /// The identity's role is not in the allowed set.
    #[error("role not allowed")]
    Forbidden,
}

/// Check an (optional) identity against a route's allowed roles.
pub fn require_role(identity: Option<&Identity>, allowed: &[Role]) -> Result<(), GateError> {
    let identity = identity.ok_or(GateError::Unauthenticated)?;
    if allowed.contains(&identity.role) {
        Ok(())
    } else {
        Err(GateError::Forbidden)
    }
}
