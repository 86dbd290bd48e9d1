//! Identity-provider adapters.

mod in_memory;
mod rest;

pub use in_memory::InMemoryIdentityProvider;
pub use rest::RestIdentityProvider;
