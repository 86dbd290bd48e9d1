//! HTTP application wiring (router + service wiring).
//!
//! Layout:
//! - `services.rs`: backend wiring (identity provider + store adapters)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and their validation schemas
//! - `validate.rs`: the validated-body extractor
//! - `errors.rs`: the single error funnel

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::Config;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;
pub mod validate;

const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the full HTTP router (public entrypoint used by `main.rs` and
/// the black-box tests).
pub fn build_app(config: &Config, services: services::AppServices) -> Router {
    errors::set_verbose(config.is_development());
    let services = Arc::new(services);

    Router::new()
        .route("/", get(routes::system::welcome))
        .route("/health", get(routes::system::health))
        .nest("/api/v1", routes::api_router(&services))
        .fallback(errors::not_found)
        .layer(
            // Request flow: headers → body limit → trace → CORS → routes.
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config))
                .layer(Extension(services)),
        )
}

/// CORS restricted to the configured frontend origin; permissive when no
/// origin is configured (credentials disabled in that case).
fn cors_layer(config: &Config) -> CorsLayer {
    let Some(origin) = &config.frontend_url else {
        return CorsLayer::permissive();
    };
    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(value))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true),
        Err(_) => {
            tracing::warn!(%origin, "FRONTEND_URL is not a valid origin; using permissive CORS");
            CorsLayer::permissive()
        }
    }
}
