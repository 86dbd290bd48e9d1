//! Backend store adapters (`peliculas` / `alquileres` tables and the
//! rental procedures).

mod in_memory;
mod rest;

pub use in_memory::InMemoryStore;
pub use rest::RestStore;
