//! `videoclub-catalog` — movie catalog component.
//!
//! Owns the movie model, the store port the catalog reads and writes
//! through, and the service that shapes list/get/create/update/delete
//! semantics. Persistence is an external database reached via the port.

pub mod movie;
pub mod service;
pub mod store;

pub use movie::{Movie, MovieDraft, MovieFilter, MovieSummary};
pub use service::CatalogService;
pub use store::{ActiveRentals, MovieStore};
