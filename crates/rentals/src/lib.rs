//! `videoclub-rentals` — rental lifecycle component.
//!
//! The lifecycle is `none → active → returned`, terminal at returned.
//! The transitions that matter (create under the rental cap with stock,
//! and return) are atomic procedures in the external database; this crate
//! owns the advisory pre-checks, the interpretation of procedure failure
//! text, and the renter-facing queries.

pub mod rental;
pub mod service;
pub mod store;

pub use rental::{AdminRental, CreatedRental, Rental, RentalWithMovie};
pub use service::RentalService;
pub use store::RentalStore;
