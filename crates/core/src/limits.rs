//! Business limits and shared user-facing messages.
//!
//! The limits are enforced by the external database's procedures; they are
//! repeated here for response texts and for the in-memory backend that
//! models those procedures in tests.

/// Maximum simultaneous unreturned rentals per renter.
pub const MAX_ACTIVE_RENTALS: u32 = 3;

/// Default rental period used to derive the expected-return date.
pub const RENTAL_PERIOD_DAYS: i64 = 7;

/// Canonical response messages (the API speaks Spanish, like its schema).
pub mod messages {
    use super::MAX_ACTIVE_RENTALS;

    pub const UNAUTHORIZED: &str = "No autorizado";
    pub const FORBIDDEN: &str = "No tienes permisos para esta acción";
    pub const NO_STOCK_AVAILABLE: &str = "No hay copias disponibles";
    pub const ALREADY_RENTED: &str = "Ya tienes esta película alquilada";
    pub const RENTAL_NOT_FOUND: &str = "Alquiler no encontrado o ya devuelto";
    pub const MOVIE_NOT_FOUND: &str = "Película no encontrada";
    pub const SERVER_ERROR: &str = "Algo salió mal en el servidor";

    pub fn max_rentals_reached() -> String {
        format!("Has alcanzado el límite de {MAX_ACTIVE_RENTALS} películas activas")
    }
}
