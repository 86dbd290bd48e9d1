//! REST adapter for the backend database (PostgREST-style surface).
//!
//! This adapter owns transport details only: URL shaping, privileged-key
//! headers, HTTP error mapping, and JSON decoding into domain rows. No
//! business decisions are made here.

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use videoclub_catalog::{ActiveRentals, Movie, MovieDraft, MovieFilter, MovieStore};
use videoclub_core::{MovieId, Page, RentalId, StoreError, StoreResult, UserId};
use videoclub_rentals::rental::{AdminRental, Rental, RentalWithMovie};
use videoclub_rentals::store::RentalStore;

const MOVIES_TABLE: &str = "peliculas";
const RENTALS_TABLE: &str = "alquileres";
const CREATE_RENTAL_PROC: &str = "crear_alquiler";
const RETURN_RENTAL_PROC: &str = "devolver_alquiler";

/// Join fragment for rental queries: rental columns plus the movie's
/// display fields through the `pelicula_id` foreign key.
const RENTAL_JOIN_SELECT: &str =
    "id,perfil_id,pelicula_id,fecha_alquiler,fecha_devolucion_prevista,devuelto,\
     peliculas:pelicula_id(id,titulo,genero,precio_alquiler)";

/// Error body shape the backend returns for failed requests.
#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    message: Option<String>,
}

pub struct RestStore {
    client: Client,
    base: String,
    service_key: String,
}

impl RestStore {
    /// `base_url` is the backend root (no trailing slash needed);
    /// `service_key` is the privileged key, sent on every request.
    pub fn new(base_url: &str, service_key: &str) -> Self {
        Self {
            client: Client::new(),
            base: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base)
    }

    fn rpc_url(&self, procedure: &str) -> String {
        format!("{}/rest/v1/rpc/{procedure}", self.base)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn send(&self, rb: RequestBuilder) -> StoreResult<Response> {
        let resp = rb
            .send()
            .await
            .map_err(|e| StoreError::transport(e.to_string()))?;
        if resp.status().is_success() {
            return Ok(resp);
        }
        Err(error_from_response(resp).await)
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> StoreResult<T> {
        resp.json::<T>()
            .await
            .map_err(|e| StoreError::decode(e.to_string()))
    }

    /// Fetch rows (optionally with an exact total from `Content-Range`).
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> StoreResult<Vec<T>> {
        let resp = self
            .send(self.request(Method::GET, self.table_url(table)).query(query))
            .await?;
        Self::decode(resp).await
    }
}

async fn error_from_response(resp: Response) -> StoreError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<BackendErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("HTTP {status}: {body}"));
    StoreError::procedure(message)
}

/// Total row count from a `Content-Range` header (`0-9/42` or `*/42`).
fn parse_total(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.parse().ok()
}

#[async_trait]
impl MovieStore for RestStore {
    async fn list(&self, filter: &MovieFilter, page: Page) -> StoreResult<(Vec<Movie>, u64)> {
        let mut query = vec![
            ("select", "*".to_string()),
            ("order", "titulo.asc".to_string()),
            ("limit", page.limit.to_string()),
            ("offset", page.offset().to_string()),
        ];
        if let Some(genre) = &filter.genre {
            query.push(("genero", format!("ilike.*{genre}*")));
        }

        let resp = self
            .send(
                self.request(Method::GET, self.table_url(MOVIES_TABLE))
                    .query(&query)
                    .header("Prefer", "count=exact"),
            )
            .await?;

        let total = resp
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_total)
            .ok_or_else(|| StoreError::decode("missing row count in Content-Range"))?;

        let rows: Vec<Movie> = Self::decode(resp).await?;
        Ok((rows, total))
    }

    async fn get(&self, id: MovieId) -> StoreResult<Option<Movie>> {
        let rows: Vec<Movie> = self
            .select(
                MOVIES_TABLE,
                &[("select", "*".to_string()), ("id", format!("eq.{id}"))],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, draft: &MovieDraft) -> StoreResult<Movie> {
        let resp = self
            .send(
                self.request(Method::POST, self.table_url(MOVIES_TABLE))
                    .header("Prefer", "return=representation")
                    .json(draft),
            )
            .await?;
        let rows: Vec<Movie> = Self::decode(resp).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::decode("insert returned no row"))
    }

    async fn update(&self, id: MovieId, draft: &MovieDraft) -> StoreResult<Option<Movie>> {
        let resp = self
            .send(
                self.request(Method::PATCH, self.table_url(MOVIES_TABLE))
                    .query(&[("id", format!("eq.{id}"))])
                    .header("Prefer", "return=representation")
                    .json(draft),
            )
            .await?;
        let rows: Vec<Movie> = Self::decode(resp).await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, id: MovieId) -> StoreResult<()> {
        self.send(
            self.request(Method::DELETE, self.table_url(MOVIES_TABLE))
                .query(&[("id", format!("eq.{id}"))]),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ActiveRentals for RestStore {
    async fn movie_has_active_rentals(&self, id: MovieId) -> StoreResult<bool> {
        #[derive(Deserialize)]
        struct IdRow {
            #[allow(dead_code)]
            id: RentalId,
        }

        let rows: Vec<IdRow> = self
            .select(
                RENTALS_TABLE,
                &[
                    ("select", "id".to_string()),
                    ("pelicula_id", format!("eq.{id}")),
                    ("devuelto", "is.false".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(!rows.is_empty())
    }
}

#[async_trait]
impl RentalStore for RestStore {
    async fn find_active(&self, renter: UserId, movie: MovieId) -> StoreResult<Option<Rental>> {
        let rows: Vec<Rental> = self
            .select(
                RENTALS_TABLE,
                &[
                    ("select", "*".to_string()),
                    ("perfil_id", format!("eq.{renter}")),
                    ("pelicula_id", format!("eq.{movie}")),
                    ("devuelto", "is.false".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn find_owned(&self, id: RentalId, renter: UserId) -> StoreResult<Option<Rental>> {
        let rows: Vec<Rental> = self
            .select(
                RENTALS_TABLE,
                &[
                    ("select", "*".to_string()),
                    ("id", format!("eq.{id}")),
                    ("perfil_id", format!("eq.{renter}")),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn active_for_renter(&self, renter: UserId) -> StoreResult<Vec<RentalWithMovie>> {
        self.select(
            RENTALS_TABLE,
            &[
                ("select", RENTAL_JOIN_SELECT.to_string()),
                ("perfil_id", format!("eq.{renter}")),
                ("devuelto", "is.false".to_string()),
                ("order", "fecha_alquiler.desc".to_string()),
            ],
        )
        .await
    }

    async fn history_for_renter(&self, renter: UserId) -> StoreResult<Vec<RentalWithMovie>> {
        self.select(
            RENTALS_TABLE,
            &[
                ("select", RENTAL_JOIN_SELECT.to_string()),
                ("perfil_id", format!("eq.{renter}")),
                ("order", "fecha_alquiler.desc".to_string()),
            ],
        )
        .await
    }

    async fn all(&self) -> StoreResult<Vec<AdminRental>> {
        self.select(
            RENTALS_TABLE,
            &[
                ("select", RENTAL_JOIN_SELECT.to_string()),
                ("order", "fecha_alquiler.desc".to_string()),
            ],
        )
        .await
    }

    async fn create_rental(&self, renter: UserId, movie: MovieId) -> StoreResult<Rental> {
        let resp = self
            .send(
                self.request(Method::POST, self.rpc_url(CREATE_RENTAL_PROC))
                    .json(&serde_json::json!({
                        "p_user_id": renter,
                        "p_movie_id": movie,
                    })),
            )
            .await?;

        // The procedure returns either a single row or a one-row set.
        let value: serde_json::Value = Self::decode(resp).await?;
        let row = match value {
            serde_json::Value::Array(mut rows) if !rows.is_empty() => rows.remove(0),
            serde_json::Value::Array(_) => {
                return Err(StoreError::decode("procedure returned no row"));
            }
            other => other,
        };
        serde_json::from_value(row).map_err(|e| StoreError::decode(e.to_string()))
    }

    async fn return_rental(&self, id: RentalId) -> StoreResult<()> {
        self.send(
            self.request(Method::POST, self.rpc_url(RETURN_RENTAL_PROC))
                .json(&serde_json::json!({ "p_rental_id": id })),
        )
        .await?;
        Ok(())
    }
}
