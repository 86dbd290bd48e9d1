//! The error funnel: every failure becomes one JSON response shape here.

use std::sync::OnceLock;

use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use videoclub_core::{limits::messages, AppError};

static VERBOSE: OnceLock<bool> = OnceLock::new();

/// Set once at startup from the runtime mode. Development mode exposes
/// raw error detail; production hides everything non-operational.
pub fn set_verbose(verbose: bool) {
    let _ = VERBOSE.set(verbose);
}

fn verbose() -> bool {
    // Unset means nobody built the app through `build_app`; match the
    // development default.
    *VERBOSE.get().unwrap_or(&true)
}

/// Shape an [`AppError`] into the final HTTP response.
pub fn respond(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if verbose() {
        return (
            status,
            Json(json!({
                "success": false,
                "message": err.message(),
                "detail": format!("{err:?}"),
            })),
        )
            .into_response();
    }

    if err.is_operational() {
        (
            status,
            Json(json!({ "success": false, "message": err.message() })),
        )
            .into_response()
    } else {
        tracing::error!(error = %err, "unhandled error");
        (
            status,
            Json(json!({ "success": false, "message": messages::SERVER_ERROR })),
        )
            .into_response()
    }
}

/// Router fallback for unmatched routes.
pub async fn not_found(uri: Uri) -> Response {
    respond(&AppError::not_found(format!("Ruta {uri} no encontrada")))
}
