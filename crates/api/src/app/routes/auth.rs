use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use videoclub_core::AppError;

use crate::app::dto::{LoginBody, RegisterBody};
use crate::app::services::AppServices;
use crate::app::validate::Validated;
use crate::app::errors;
use crate::context::CurrentUser;
use crate::middleware::{self, AuthState};

pub fn router(auth_state: AuthState) -> Router {
    let protected = Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::authenticate,
        ));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Validated(input): Validated<RegisterBody>,
) -> axum::response::Response {
    let outcome = match services
        .identity
        .sign_up(&input.email, &input.password, &input.name)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => return errors::respond(&AppError::from(e)),
    };

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "Usuario registrado exitosamente",
            "data": {
                "user": outcome.user,
                "session": outcome.session,
            },
        })),
    )
        .into_response()
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Validated(input): Validated<LoginBody>,
) -> axum::response::Response {
    let (user, session) = match services.identity.sign_in(&input.email, &input.password).await {
        Ok(signed_in) => signed_in,
        Err(e) => return errors::respond(&AppError::from(e)),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "message": "Inicio de sesión exitoso",
            "data": {
                "user": user,
                "token": session.access_token,
                "refreshToken": session.refresh_token,
            },
        })),
    )
        .into_response()
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    // The auth middleware already vouched for this header.
    let token = match middleware::bearer_token(&headers) {
        Ok(token) => token,
        Err(msg) => return errors::respond(&AppError::unauthorized(msg)),
    };

    if let Err(e) = services.identity.sign_out(token).await {
        tracing::warn!(error = %e, "sign-out failed");
        return errors::respond(&AppError::internal("Error al cerrar sesión"));
    }

    Json(serde_json::json!({
        "success": true,
        "data": { "message": "Sesión cerrada exitosamente" },
    }))
    .into_response()
}

pub async fn me(Extension(user): Extension<CurrentUser>) -> axum::response::Response {
    Json(serde_json::json!({
        "success": true,
        "data": { "user": user.0 },
    }))
    .into_response()
}
