//! Rental port onto the external database, including the two atomic
//! procedures.

use async_trait::async_trait;

use videoclub_core::{MovieId, RentalId, StoreResult, UserId};

use crate::rental::{AdminRental, Rental, RentalWithMovie};

/// Failure-text fragments produced by the database procedures. The store
/// reports these verbatim inside [`StoreError::Procedure`]; the service
/// keys on them by substring. Any other text means an unclassified
/// failure.
///
/// [`StoreError::Procedure`]: videoclub_core::StoreError::Procedure
pub mod procedure_errors {
    /// `crear_alquiler`: the renter already holds the maximum of active rentals.
    pub const RENTAL_LIMIT: &str = "Límite de 3 películas";
    /// `crear_alquiler`: no copies available.
    pub const NO_STOCK: &str = "Sin stock disponible";
    /// `crear_alquiler`: unknown movie id.
    pub const MOVIE_NOT_FOUND: &str = "Película no encontrada";
    /// `devolver_alquiler`: unknown rental id or already returned.
    pub const RENTAL_GONE: &str = "no encontrado o ya devuelto";
}

/// Read/write access to the rental table and its procedures.
#[async_trait]
pub trait RentalStore: Send + Sync {
    /// The renter's unreturned rental of a movie, if any (advisory
    /// duplicate pre-check; not authoritative under concurrency).
    async fn find_active(&self, renter: UserId, movie: MovieId) -> StoreResult<Option<Rental>>;

    /// A rental by id, visible only to its owner.
    async fn find_owned(&self, id: RentalId, renter: UserId) -> StoreResult<Option<Rental>>;

    /// Unreturned rentals of a renter, newest first, joined with movie
    /// display fields.
    async fn active_for_renter(&self, renter: UserId) -> StoreResult<Vec<RentalWithMovie>>;

    /// Full rental history of a renter, newest first.
    async fn history_for_renter(&self, renter: UserId) -> StoreResult<Vec<RentalWithMovie>>;

    /// Every rental across all renters, newest first (admin query).
    async fn all(&self) -> StoreResult<Vec<AdminRental>>;

    /// The atomic creation procedure: checks the rental cap, checks and
    /// decrements stock, and inserts the row in one transaction. This is
    /// the sole authority for those invariants.
    async fn create_rental(&self, renter: UserId, movie: MovieId) -> StoreResult<Rental>;

    /// The atomic return procedure: marks the rental returned and
    /// restores stock in one transaction.
    async fn return_rental(&self, id: RentalId) -> StoreResult<()>;
}
