//! Observability bootstrap.

mod tracing;

pub use tracing::init;
