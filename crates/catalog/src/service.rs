use std::sync::Arc;

use videoclub_core::{
    limits::messages, AppError, AppResult, MovieId, Page, Pagination,
};

use crate::movie::{Movie, MovieDraft, MovieFilter};
use crate::store::{ActiveRentals, MovieStore};

/// Catalog operations, constructed once at startup and shared by the
/// route handlers.
#[derive(Clone)]
pub struct CatalogService {
    movies: Arc<dyn MovieStore>,
    rentals: Arc<dyn ActiveRentals>,
}

impl CatalogService {
    pub fn new(movies: Arc<dyn MovieStore>, rentals: Arc<dyn ActiveRentals>) -> Self {
        Self { movies, rentals }
    }

    pub async fn list(
        &self,
        filter: MovieFilter,
        page: Page,
    ) -> AppResult<(Vec<Movie>, Pagination)> {
        let (movies, total) = self.movies.list(&filter, page).await?;
        Ok((movies, Pagination::new(page, total)))
    }

    pub async fn get(&self, id: MovieId) -> AppResult<Movie> {
        self.movies
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(messages::MOVIE_NOT_FOUND))
    }

    pub async fn create(&self, draft: MovieDraft) -> AppResult<Movie> {
        Ok(self.movies.insert(&draft).await?)
    }

    pub async fn update(&self, id: MovieId, draft: MovieDraft) -> AppResult<Movie> {
        // Existence check first so a missing row reads as 404, not as an
        // opaque backend failure.
        self.get(id).await?;
        self.movies
            .update(id, &draft)
            .await?
            .ok_or_else(|| AppError::not_found(messages::MOVIE_NOT_FOUND))
    }

    /// Delete a movie unless it still has unreturned rentals.
    ///
    /// The rental check is a separate read; a rental created between the
    /// check and the delete slips through. Accepted: the authoritative
    /// referential guard is the external database.
    pub async fn delete(&self, id: MovieId) -> AppResult<()> {
        self.get(id).await?;
        if self.rentals.movie_has_active_rentals(id).await? {
            return Err(AppError::validation(
                "No se puede eliminar una película con alquileres activos",
            ));
        }
        self.movies.delete(id).await?;
        Ok(())
    }
}
