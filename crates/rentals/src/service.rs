use std::sync::Arc;

use videoclub_catalog::MovieStore;
use videoclub_core::{
    limits::messages, AppError, AppResult, MovieId, RentalId, StoreError, UserId,
};

use crate::rental::{AdminRental, CreatedRental, RentalWithMovie};
use crate::store::{procedure_errors, RentalStore};

/// Rental operations, constructed once at startup and shared by the
/// route handlers.
#[derive(Clone)]
pub struct RentalService {
    rentals: Arc<dyn RentalStore>,
    movies: Arc<dyn MovieStore>,
}

impl RentalService {
    pub fn new(rentals: Arc<dyn RentalStore>, movies: Arc<dyn MovieStore>) -> Self {
        Self { rentals, movies }
    }

    /// Rent a movie for a renter.
    ///
    /// The duplicate check is a fast-path courtesy only; under concurrent
    /// requests for the same pair the database procedure is what actually
    /// holds the line.
    pub async fn create(&self, renter: UserId, movie_id: MovieId) -> AppResult<CreatedRental> {
        if self.rentals.find_active(renter, movie_id).await?.is_some() {
            return Err(AppError::validation(messages::ALREADY_RENTED));
        }

        let rental = self
            .rentals
            .create_rental(renter, movie_id)
            .await
            .map_err(interpret_create_failure)?;

        // Secondary read for the response payload; the rental is already
        // committed, so a failure here only costs the display fields.
        let movie = match self.movies.get(movie_id).await {
            Ok(found) => found.map(|m| m.summary()),
            Err(err) => {
                tracing::warn!(%movie_id, error = %err, "movie lookup after rental failed");
                None
            }
        };

        Ok(CreatedRental { rental, movie })
    }

    /// Return a rental owned by the renter.
    pub async fn return_rental(&self, renter: UserId, id: RentalId) -> AppResult<RentalId> {
        let rental = self
            .rentals
            .find_owned(id, renter)
            .await?
            .ok_or_else(|| AppError::not_found("Alquiler no encontrado"))?;

        if rental.returned {
            return Err(AppError::validation("Esta película ya fue devuelta"));
        }

        self.rentals
            .return_rental(id)
            .await
            .map_err(interpret_return_failure)?;

        Ok(id)
    }

    pub async fn active(&self, renter: UserId) -> AppResult<Vec<RentalWithMovie>> {
        Ok(self.rentals.active_for_renter(renter).await?)
    }

    pub async fn history(&self, renter: UserId) -> AppResult<Vec<RentalWithMovie>> {
        Ok(self.rentals.history_for_renter(renter).await?)
    }

    pub async fn all(&self) -> AppResult<Vec<AdminRental>> {
        Ok(self.rentals.all().await?)
    }
}

/// Map `crear_alquiler` failure text onto the error taxonomy.
fn interpret_create_failure(err: StoreError) -> AppError {
    match err {
        StoreError::Procedure(msg) => {
            if msg.contains(procedure_errors::RENTAL_LIMIT) {
                AppError::validation(messages::max_rentals_reached())
            } else if msg.contains(procedure_errors::NO_STOCK) {
                AppError::validation(messages::NO_STOCK_AVAILABLE)
            } else if msg.contains(procedure_errors::MOVIE_NOT_FOUND) {
                AppError::not_found(messages::MOVIE_NOT_FOUND)
            } else {
                AppError::internal(format!("Error al crear alquiler: {msg}"))
            }
        }
        other => other.into(),
    }
}

/// Map `devolver_alquiler` failure text onto the error taxonomy.
fn interpret_return_failure(err: StoreError) -> AppError {
    match err {
        StoreError::Procedure(msg) if msg.contains(procedure_errors::RENTAL_GONE) => {
            AppError::not_found(messages::RENTAL_NOT_FOUND)
        }
        StoreError::Procedure(msg) => {
            AppError::internal(format!("Error al devolver película: {msg}"))
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use videoclub_catalog::{Movie, MovieDraft, MovieFilter};
    use videoclub_core::error::ErrorKind;
    use videoclub_core::{Page, StoreResult};

    use crate::rental::{due_date, Rental};

    #[test]
    fn create_failures_map_by_substring() {
        let cases = [
            (
                "Límite de 3 películas alcanzado para este usuario",
                ErrorKind::Validation,
            ),
            ("Sin stock disponible para la película", ErrorKind::Validation),
            ("Película no encontrada", ErrorKind::NotFound),
            ("deadlock detected", ErrorKind::Internal),
        ];
        for (msg, expected) in cases {
            let err = interpret_create_failure(StoreError::procedure(msg));
            assert_eq!(err.kind(), expected, "message: {msg}");
        }
    }

    #[test]
    fn return_failures_map_by_substring() {
        let err = interpret_return_failure(StoreError::procedure(
            "Alquiler no encontrado o ya devuelto",
        ));
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = interpret_return_failure(StoreError::procedure("permission denied"));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn transport_failures_stay_internal() {
        let err = interpret_create_failure(StoreError::transport("connection refused"));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    /// Scripted store: one optional pre-existing active rental and a
    /// scripted procedure outcome.
    struct FakeRentals {
        existing_active: Option<Rental>,
        owned: Option<Rental>,
        create_result: Mutex<Option<StoreResult<Rental>>>,
        return_result: Mutex<Option<StoreResult<()>>>,
    }

    impl FakeRentals {
        fn empty() -> Self {
            Self {
                existing_active: None,
                owned: None,
                create_result: Mutex::new(None),
                return_result: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl RentalStore for FakeRentals {
        async fn find_active(&self, _: UserId, _: MovieId) -> StoreResult<Option<Rental>> {
            Ok(self.existing_active.clone())
        }

        async fn find_owned(&self, _: RentalId, _: UserId) -> StoreResult<Option<Rental>> {
            Ok(self.owned.clone())
        }

        async fn active_for_renter(&self, _: UserId) -> StoreResult<Vec<RentalWithMovie>> {
            Ok(vec![])
        }

        async fn history_for_renter(&self, _: UserId) -> StoreResult<Vec<RentalWithMovie>> {
            Ok(vec![])
        }

        async fn all(&self) -> StoreResult<Vec<AdminRental>> {
            Ok(vec![])
        }

        async fn create_rental(&self, _: UserId, _: MovieId) -> StoreResult<Rental> {
            self.create_result.lock().unwrap().take().expect("unscripted create")
        }

        async fn return_rental(&self, _: RentalId) -> StoreResult<()> {
            self.return_result.lock().unwrap().take().expect("unscripted return")
        }
    }

    struct NoMovies;

    #[async_trait]
    impl MovieStore for NoMovies {
        async fn list(&self, _: &MovieFilter, _: Page) -> StoreResult<(Vec<Movie>, u64)> {
            Ok((vec![], 0))
        }
        async fn get(&self, _: MovieId) -> StoreResult<Option<Movie>> {
            Ok(None)
        }
        async fn insert(&self, _: &MovieDraft) -> StoreResult<Movie> {
            Err(StoreError::procedure("read-only"))
        }
        async fn update(&self, _: MovieId, _: &MovieDraft) -> StoreResult<Option<Movie>> {
            Err(StoreError::procedure("read-only"))
        }
        async fn delete(&self, _: MovieId) -> StoreResult<()> {
            Err(StoreError::procedure("read-only"))
        }
    }

    fn rental(renter: UserId, movie: MovieId, returned: bool) -> Rental {
        let now = Utc::now();
        Rental {
            id: RentalId::new(),
            renter_id: renter,
            movie_id: movie,
            rented_at: now,
            due_at: due_date(now),
            returned,
        }
    }

    fn service(store: FakeRentals) -> RentalService {
        RentalService::new(Arc::new(store), Arc::new(NoMovies))
    }

    #[tokio::test]
    async fn duplicate_rental_is_rejected_before_the_procedure_runs() {
        let renter = UserId::new();
        let movie = MovieId::new();
        let mut store = FakeRentals::empty();
        store.existing_active = Some(rental(renter, movie, false));
        // create_result deliberately unscripted: reaching it would panic.
        let err = service(store).create(renter, movie).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), messages::ALREADY_RENTED);
    }

    #[tokio::test]
    async fn create_succeeds_without_movie_display_fields() {
        let renter = UserId::new();
        let movie = MovieId::new();
        let store = FakeRentals::empty();
        *store.create_result.lock().unwrap() = Some(Ok(rental(renter, movie, false)));

        let created = service(store).create(renter, movie).await.unwrap();
        assert!(created.rental.is_active());
        assert!(created.movie.is_none());
    }

    #[tokio::test]
    async fn returning_a_foreign_or_unknown_rental_is_not_found() {
        let store = FakeRentals::empty();
        let err = service(store)
            .return_rental(UserId::new(), RentalId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn returning_twice_is_a_validation_error() {
        let renter = UserId::new();
        let mut store = FakeRentals::empty();
        let owned = rental(renter, MovieId::new(), true);
        let id = owned.id;
        store.owned = Some(owned);

        let err = service(store).return_rental(renter, id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
