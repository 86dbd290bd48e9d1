//! `videoclub-infra` — adapters for the external collaborators.
//!
//! Two collaborators exist: the identity provider (credential store,
//! opaque bearer tokens) and the relational backend (catalog and rental
//! tables plus the atomic rental procedures). Each has a REST adapter for
//! production and an in-memory twin for tests/dev that models the same
//! contract, including the procedures' failure text.

pub mod identity;
pub mod store;

pub use identity::{InMemoryIdentityProvider, RestIdentityProvider};
pub use store::{InMemoryStore, RestStore};
