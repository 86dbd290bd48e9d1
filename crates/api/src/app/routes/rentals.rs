use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use videoclub_auth::Role;
use videoclub_core::RentalId;

use crate::app::dto::RentalBody;
use crate::app::errors;
use crate::app::services::AppServices;
use crate::app::validate::Validated;
use crate::context::CurrentUser;
use crate::middleware::{self, AuthState, RoleState};

pub fn router(auth_state: AuthState) -> Router {
    let admin = Router::new()
        .route("/", get(list_all_rentals))
        .route_layer(axum::middleware::from_fn_with_state(
            RoleState { allowed: &[Role::Admin] },
            middleware::authorize,
        ));

    Router::new()
        .route("/", post(create_rental))
        .route("/active", get(active_rentals))
        .route("/history", get(rental_history))
        .route("/:id/return", post(return_rental))
        .merge(admin)
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::authenticate,
        ))
}

pub async fn create_rental(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Validated(movie_id): Validated<RentalBody>,
) -> axum::response::Response {
    match services.rentals.create(user.0.id, movie_id).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "success": true,
                "message": "Película alquilada exitosamente",
                "data": created,
            })),
        )
            .into_response(),
        Err(e) => errors::respond(&e),
    }
}

pub async fn return_rental(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RentalId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::respond(&e),
    };

    match services.rentals.return_rental(user.0.id, id).await {
        Ok(rental_id) => Json(serde_json::json!({
            "success": true,
            "data": {
                "message": "Película devuelta exitosamente",
                "alquiler_id": rental_id,
            },
        }))
        .into_response(),
        Err(e) => errors::respond(&e),
    }
}

pub async fn active_rentals(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    match services.rentals.active(user.0.id).await {
        Ok(rentals) => Json(serde_json::json!({
            "success": true,
            "count": rentals.len(),
            "data": rentals,
        }))
        .into_response(),
        Err(e) => errors::respond(&e),
    }
}

pub async fn rental_history(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    match services.rentals.history(user.0.id).await {
        Ok(rentals) => Json(serde_json::json!({
            "success": true,
            "count": rentals.len(),
            "data": rentals,
        }))
        .into_response(),
        Err(e) => errors::respond(&e),
    }
}

pub async fn list_all_rentals(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.rentals.all().await {
        Ok(rentals) => Json(serde_json::json!({
            "success": true,
            "count": rentals.len(),
            "data": rentals,
        }))
        .into_response(),
        Err(e) => errors::respond(&e),
    }
}
