//! `videoclub-auth` — authentication/authorization boundary.
//!
//! Token verification itself happens at an external identity provider;
//! this crate owns the resolved identity model, the role policy, and the
//! provider contract. It is intentionally decoupled from HTTP and storage.

pub mod gate;
pub mod identity;
pub mod provider;
pub mod role;

pub use gate::{require_role, GateError};
pub use identity::Identity;
pub use provider::{AuthError, IdentityProvider, Session, SignUpOutcome};
pub use role::Role;
