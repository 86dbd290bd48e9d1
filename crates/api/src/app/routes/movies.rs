use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use videoclub_auth::Role;
use videoclub_catalog::MovieFilter;
use videoclub_core::{MovieId, Page, PageQuery};

use crate::app::dto::MovieBody;
use crate::app::errors;
use crate::app::services::AppServices;
use crate::app::validate::Validated;
use crate::middleware::{self, AuthState, RoleState};

pub fn router(auth_state: AuthState) -> Router {
    let admin = Router::new()
        .route("/", post(create_movie))
        .route("/:id", put(update_movie).delete(delete_movie))
        .route_layer(axum::middleware::from_fn_with_state(
            RoleState { allowed: &[Role::Admin] },
            middleware::authorize,
        ))
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::authenticate,
        ));

    Router::new()
        .route("/", get(list_movies))
        .route("/:id", get(get_movie))
        .merge(admin)
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    page: Option<u32>,
    limit: Option<u32>,
    genero: Option<String>,
}

pub async fn list_movies(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ListQuery>,
) -> axum::response::Response {
    let filter = MovieFilter { genre: query.genero.filter(|g| !g.is_empty()) };
    let page = Page::from(PageQuery { page: query.page, limit: query.limit });

    match services.catalog.list(filter, page).await {
        Ok((movies, pagination)) => Json(serde_json::json!({
            "success": true,
            "data": movies,
            "pagination": pagination,
        }))
        .into_response(),
        Err(e) => errors::respond(&e),
    }
}

pub async fn get_movie(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: MovieId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::respond(&e),
    };

    match services.catalog.get(id).await {
        Ok(movie) => Json(serde_json::json!({ "success": true, "data": movie })).into_response(),
        Err(e) => errors::respond(&e),
    }
}

pub async fn create_movie(
    Extension(services): Extension<Arc<AppServices>>,
    Validated(draft): Validated<MovieBody>,
) -> axum::response::Response {
    match services.catalog.create(draft).await {
        Ok(movie) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "success": true,
                "message": "Película creada exitosamente",
                "data": movie,
            })),
        )
            .into_response(),
        Err(e) => errors::respond(&e),
    }
}

pub async fn update_movie(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Validated(draft): Validated<MovieBody>,
) -> axum::response::Response {
    let id: MovieId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::respond(&e),
    };

    match services.catalog.update(id, draft).await {
        Ok(movie) => Json(serde_json::json!({
            "success": true,
            "message": "Película actualizada exitosamente",
            "data": movie,
        }))
        .into_response(),
        Err(e) => errors::respond(&e),
    }
}

pub async fn delete_movie(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: MovieId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::respond(&e),
    };

    match services.catalog.delete(id).await {
        Ok(()) => Json(serde_json::json!({
            "success": true,
            "data": { "message": "Película eliminada exitosamente" },
        }))
        .into_response(),
        Err(e) => errors::respond(&e),
    }
}
