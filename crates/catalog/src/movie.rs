use serde::{Deserialize, Serialize};

use videoclub_core::MovieId;

/// A catalog row as stored by the external database.
///
/// Wire names follow the `peliculas` table schema; the invariant
/// `available_stock <= total_stock` is enforced by that database, this
/// layer only mirrors the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "genero")]
    pub genre: String,
    #[serde(rename = "stock_total")]
    pub total_stock: u32,
    #[serde(rename = "stock_disponible")]
    pub available_stock: u32,
    #[serde(rename = "precio_alquiler")]
    pub rental_price: f64,
    #[serde(rename = "poster_url", default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(rename = "anio", default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(rename = "duracion", default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Movie {
    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            genre: self.genre.clone(),
            rental_price: self.rental_price,
        }
    }
}

/// The display fields joined onto rental rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "genero")]
    pub genre: String,
    #[serde(rename = "precio_alquiler")]
    pub rental_price: f64,
}

/// A validated create/update payload (everything but the id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDraft {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "genero")]
    pub genre: String,
    #[serde(rename = "stock_total")]
    pub total_stock: u32,
    #[serde(rename = "stock_disponible")]
    pub available_stock: u32,
    #[serde(rename = "precio_alquiler")]
    pub rental_price: f64,
    #[serde(rename = "poster_url", default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(rename = "anio", default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(rename = "duracion", default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MovieDraft {
    pub fn into_movie(self, id: MovieId) -> Movie {
        Movie {
            id,
            title: self.title,
            genre: self.genre,
            total_stock: self.total_stock,
            available_stock: self.available_stock,
            rental_price: self.rental_price,
            poster_url: self.poster_url,
            director: self.director,
            year: self.year,
            duration_minutes: self.duration_minutes,
            description: self.description,
        }
    }
}

/// Filter applied to catalog listings.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MovieFilter {
    /// Case-insensitive substring match on the genre.
    pub genre: Option<String>,
}

impl MovieFilter {
    /// Whether a genre value matches the filter (the in-memory backend's
    /// equivalent of the database's `ilike '%..%'`).
    pub fn matches(&self, genre: &str) -> bool {
        match &self.genre {
            None => true,
            Some(needle) => genre.to_lowercase().contains(&needle.to_lowercase()),
        }
    }
}
