use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use videoclub_catalog::MovieSummary;
use videoclub_core::{limits::RENTAL_PERIOD_DAYS, MovieId, RentalId, UserId};

/// A rental row as stored by the external database (`alquileres` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    pub id: RentalId,
    #[serde(rename = "perfil_id")]
    pub renter_id: UserId,
    #[serde(rename = "pelicula_id")]
    pub movie_id: MovieId,
    #[serde(rename = "fecha_alquiler")]
    pub rented_at: DateTime<Utc>,
    #[serde(rename = "fecha_devolucion_prevista")]
    pub due_at: DateTime<Utc>,
    #[serde(rename = "devuelto")]
    pub returned: bool,
}

impl Rental {
    pub fn is_active(&self) -> bool {
        !self.returned
    }
}

/// Expected-return date derived from the rental timestamp.
pub fn due_date(rented_at: DateTime<Utc>) -> DateTime<Utc> {
    rented_at + Duration::days(RENTAL_PERIOD_DAYS)
}

/// A rental joined with the movie's display fields, as the renter-facing
/// queries return it. The movie is `None` when the row outlived a movie
/// that was later deleted (possible only for returned rentals).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalWithMovie {
    pub id: RentalId,
    #[serde(rename = "fecha_alquiler")]
    pub rented_at: DateTime<Utc>,
    #[serde(rename = "fecha_devolucion_prevista")]
    pub due_at: DateTime<Utc>,
    #[serde(rename = "devuelto")]
    pub returned: bool,
    #[serde(rename = "peliculas")]
    pub movie: Option<MovieSummary>,
}

/// The admin view additionally exposes the renter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminRental {
    pub id: RentalId,
    #[serde(rename = "perfil_id")]
    pub renter_id: UserId,
    #[serde(rename = "fecha_alquiler")]
    pub rented_at: DateTime<Utc>,
    #[serde(rename = "fecha_devolucion_prevista")]
    pub due_at: DateTime<Utc>,
    #[serde(rename = "devuelto")]
    pub returned: bool,
    #[serde(rename = "peliculas")]
    pub movie: Option<MovieSummary>,
}

/// Payload assembled after a successful rental creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedRental {
    #[serde(rename = "alquiler")]
    pub rental: Rental,
    #[serde(rename = "pelicula")]
    pub movie: Option<MovieSummary>,
}
