use std::sync::Arc;

use axum::Router;

use crate::app::services::AppServices;
use crate::middleware::AuthState;

pub mod auth;
pub mod movies;
pub mod rentals;
pub mod system;

/// Router for everything under `/api/v1`.
pub fn api_router(services: &Arc<AppServices>) -> Router {
    let auth_state = AuthState { identity: services.identity.clone() };

    Router::new()
        .nest("/auth", auth::router(auth_state.clone()))
        .nest("/movies", movies::router(auth_state.clone()))
        .nest("/rentals", rentals::router(auth_state))
}
