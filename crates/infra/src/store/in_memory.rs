use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use videoclub_catalog::{ActiveRentals, Movie, MovieDraft, MovieFilter, MovieStore};
use videoclub_core::{MovieId, Page, RentalId, StoreError, StoreResult, UserId};
use videoclub_rentals::rental::{due_date, AdminRental, Rental, RentalWithMovie};
use videoclub_rentals::store::{procedure_errors, RentalStore};

#[derive(Debug, Default)]
struct State {
    movies: HashMap<MovieId, Movie>,
    rentals: HashMap<RentalId, Rental>,
}

/// In-memory model of the external database.
///
/// Intended for tests/dev. One lock over the whole state makes the
/// rental procedures genuinely atomic, which is exactly the guarantee the
/// real backend's transactions give.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| StoreError::transport("lock poisoned"))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| StoreError::transport("lock poisoned"))
    }
}

fn active_count(state: &State, renter: UserId) -> usize {
    state
        .rentals
        .values()
        .filter(|r| r.renter_id == renter && r.is_active())
        .count()
}

fn join_movie(state: &State, rental: &Rental) -> RentalWithMovie {
    RentalWithMovie {
        id: rental.id,
        rented_at: rental.rented_at,
        due_at: rental.due_at,
        returned: rental.returned,
        movie: state.movies.get(&rental.movie_id).map(Movie::summary),
    }
}

#[async_trait]
impl MovieStore for InMemoryStore {
    async fn list(&self, filter: &MovieFilter, page: Page) -> StoreResult<(Vec<Movie>, u64)> {
        let state = self.read()?;
        let mut rows: Vec<Movie> = state
            .movies
            .values()
            .filter(|m| filter.matches(&m.genre))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.title.cmp(&b.title));
        let total = rows.len() as u64;
        let rows = rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((rows, total))
    }

    async fn get(&self, id: MovieId) -> StoreResult<Option<Movie>> {
        Ok(self.read()?.movies.get(&id).cloned())
    }

    async fn insert(&self, draft: &MovieDraft) -> StoreResult<Movie> {
        let movie = draft.clone().into_movie(MovieId::new());
        self.write()?.movies.insert(movie.id, movie.clone());
        Ok(movie)
    }

    async fn update(&self, id: MovieId, draft: &MovieDraft) -> StoreResult<Option<Movie>> {
        let mut state = self.write()?;
        match state.movies.get_mut(&id) {
            Some(slot) => {
                *slot = draft.clone().into_movie(id);
                Ok(Some(slot.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: MovieId) -> StoreResult<()> {
        self.write()?.movies.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ActiveRentals for InMemoryStore {
    async fn movie_has_active_rentals(&self, id: MovieId) -> StoreResult<bool> {
        let state = self.read()?;
        Ok(state
            .rentals
            .values()
            .any(|r| r.movie_id == id && r.is_active()))
    }
}

#[async_trait]
impl RentalStore for InMemoryStore {
    async fn find_active(&self, renter: UserId, movie: MovieId) -> StoreResult<Option<Rental>> {
        let state = self.read()?;
        Ok(state
            .rentals
            .values()
            .find(|r| r.renter_id == renter && r.movie_id == movie && r.is_active())
            .cloned())
    }

    async fn find_owned(&self, id: RentalId, renter: UserId) -> StoreResult<Option<Rental>> {
        let state = self.read()?;
        Ok(state
            .rentals
            .get(&id)
            .filter(|r| r.renter_id == renter)
            .cloned())
    }

    async fn active_for_renter(&self, renter: UserId) -> StoreResult<Vec<RentalWithMovie>> {
        let state = self.read()?;
        let mut rows: Vec<_> = state
            .rentals
            .values()
            .filter(|r| r.renter_id == renter && r.is_active())
            .map(|r| join_movie(&state, r))
            .collect();
        rows.sort_by(|a, b| b.rented_at.cmp(&a.rented_at));
        Ok(rows)
    }

    async fn history_for_renter(&self, renter: UserId) -> StoreResult<Vec<RentalWithMovie>> {
        let state = self.read()?;
        let mut rows: Vec<_> = state
            .rentals
            .values()
            .filter(|r| r.renter_id == renter)
            .map(|r| join_movie(&state, r))
            .collect();
        rows.sort_by(|a, b| b.rented_at.cmp(&a.rented_at));
        Ok(rows)
    }

    async fn all(&self) -> StoreResult<Vec<AdminRental>> {
        let state = self.read()?;
        let mut rows: Vec<_> = state
            .rentals
            .values()
            .map(|r| AdminRental {
                id: r.id,
                renter_id: r.renter_id,
                rented_at: r.rented_at,
                due_at: r.due_at,
                returned: r.returned,
                movie: state.movies.get(&r.movie_id).map(Movie::summary),
            })
            .collect();
        rows.sort_by(|a, b| b.rented_at.cmp(&a.rented_at));
        Ok(rows)
    }

    async fn create_rental(&self, renter: UserId, movie: MovieId) -> StoreResult<Rental> {
        let mut state = self.write()?;

        if !state.movies.contains_key(&movie) {
            return Err(StoreError::procedure(procedure_errors::MOVIE_NOT_FOUND));
        }
        if active_count(&state, renter) >= videoclub_core::limits::MAX_ACTIVE_RENTALS as usize {
            return Err(StoreError::procedure(format!(
                "{} activas alcanzado",
                procedure_errors::RENTAL_LIMIT
            )));
        }
        let stock = state
            .movies
            .get(&movie)
            .map(|m| m.available_stock)
            .unwrap_or(0);
        if stock == 0 {
            return Err(StoreError::procedure(procedure_errors::NO_STOCK));
        }

        if let Some(m) = state.movies.get_mut(&movie) {
            m.available_stock -= 1;
        }
        let now = Utc::now();
        let rental = Rental {
            id: RentalId::new(),
            renter_id: renter,
            movie_id: movie,
            rented_at: now,
            due_at: due_date(now),
            returned: false,
        };
        state.rentals.insert(rental.id, rental.clone());
        Ok(rental)
    }

    async fn return_rental(&self, id: RentalId) -> StoreResult<()> {
        let mut state = self.write()?;

        let movie_id = match state.rentals.get(&id) {
            Some(r) if r.is_active() => r.movie_id,
            _ => {
                return Err(StoreError::procedure(format!(
                    "Alquiler {}",
                    procedure_errors::RENTAL_GONE
                )));
            }
        };

        if let Some(r) = state.rentals.get_mut(&id) {
            r.returned = true;
        }
        if let Some(m) = state.movies.get_mut(&movie_id) {
            if m.available_stock < m.total_stock {
                m.available_stock += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use videoclub_core::limits::MAX_ACTIVE_RENTALS;

    fn draft(title: &str, available: u32) -> MovieDraft {
        MovieDraft {
            title: title.to_string(),
            genre: "Drama".to_string(),
            total_stock: available.max(1),
            available_stock: available,
            rental_price: 2.0,
            poster_url: None,
            director: None,
            year: None,
            duration_minutes: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn rental_cap_is_enforced_atomically() {
        let store = InMemoryStore::new();
        let renter = UserId::new();
        for i in 0..MAX_ACTIVE_RENTALS {
            let m = store.insert(&draft(&format!("M{i}"), 1)).await.unwrap();
            store.create_rental(renter, m.id).await.unwrap();
        }

        let extra = store.insert(&draft("Extra", 1)).await.unwrap();
        let err = store.create_rental(renter, extra.id).await.unwrap_err();
        match err {
            StoreError::Procedure(msg) => assert!(msg.contains(procedure_errors::RENTAL_LIMIT)),
            other => panic!("unexpected error: {other:?}"),
        }
        // No fourth record, and the movie's stock is untouched.
        assert_eq!(store.active_for_renter(renter).await.unwrap().len(), 3);
        assert_eq!(store.get(extra.id).await.unwrap().unwrap().available_stock, 1);
    }

    #[tokio::test]
    async fn exhausted_stock_rejects_without_decrement() {
        let store = InMemoryStore::new();
        let m = store.insert(&draft("Matrix", 0)).await.unwrap();
        let err = store.create_rental(UserId::new(), m.id).await.unwrap_err();
        match err {
            StoreError::Procedure(msg) => assert!(msg.contains(procedure_errors::NO_STOCK)),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.get(m.id).await.unwrap().unwrap().available_stock, 0);
    }

    #[tokio::test]
    async fn unknown_movie_reports_the_procedure_text() {
        let store = InMemoryStore::new();
        let err = store
            .create_rental(UserId::new(), MovieId::new())
            .await
            .unwrap_err();
        match err {
            StoreError::Procedure(msg) => {
                assert!(msg.contains(procedure_errors::MOVIE_NOT_FOUND))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_decrements_and_return_restores_stock() {
        let store = InMemoryStore::new();
        let renter = UserId::new();
        let m = store.insert(&draft("Matrix", 2)).await.unwrap();

        let rental = store.create_rental(renter, m.id).await.unwrap();
        assert_eq!(store.get(m.id).await.unwrap().unwrap().available_stock, 1);

        store.return_rental(rental.id).await.unwrap();
        assert_eq!(store.get(m.id).await.unwrap().unwrap().available_stock, 2);
        assert!(store.active_for_renter(renter).await.unwrap().is_empty());
        assert_eq!(store.history_for_renter(renter).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn double_return_reports_the_procedure_text() {
        let store = InMemoryStore::new();
        let renter = UserId::new();
        let m = store.insert(&draft("Matrix", 1)).await.unwrap();
        let rental = store.create_rental(renter, m.id).await.unwrap();
        store.return_rental(rental.id).await.unwrap();

        let err = store.return_rental(rental.id).await.unwrap_err();
        match err {
            StoreError::Procedure(msg) => assert!(msg.contains(procedure_errors::RENTAL_GONE)),
            other => panic!("unexpected error: {other:?}"),
        }
        // Stock is not incremented twice.
        assert_eq!(store.get(m.id).await.unwrap().unwrap().available_stock, 1);
    }
}
