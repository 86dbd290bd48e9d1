//! Catalog ports onto the external database.

use async_trait::async_trait;

use videoclub_core::{MovieId, Page, StoreResult};

use crate::movie::{Movie, MovieDraft, MovieFilter};

/// Read/write access to the movie table.
///
/// Implementations own transport only; they do not validate drafts or
/// decide response codes.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// One page of movies ordered by title ascending, plus the exact
    /// number of rows matching the filter.
    async fn list(&self, filter: &MovieFilter, page: Page) -> StoreResult<(Vec<Movie>, u64)>;

    async fn get(&self, id: MovieId) -> StoreResult<Option<Movie>>;

    async fn insert(&self, draft: &MovieDraft) -> StoreResult<Movie>;

    /// Update an existing row; `None` when the row vanished.
    async fn update(&self, id: MovieId, draft: &MovieDraft) -> StoreResult<Option<Movie>>;

    async fn delete(&self, id: MovieId) -> StoreResult<()>;
}

/// The one rental-table question the catalog needs: does a movie still
/// have unreturned rentals? Kept as its own port so the catalog does not
/// depend on the rental component.
#[async_trait]
pub trait ActiveRentals: Send + Sync {
    async fn movie_has_active_rentals(&self, id: MovieId) -> StoreResult<bool>;
}
