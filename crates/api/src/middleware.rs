use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use videoclub_auth::{GateError, Identity, IdentityProvider, Role};
use videoclub_core::{limits::messages, AppError};

use crate::app::errors;
use crate::context::CurrentUser;

#[derive(Clone)]
pub struct AuthState {
    pub identity: Arc<dyn IdentityProvider>,
}

/// Allowed-role set for a route group.
#[derive(Clone)]
pub struct RoleState {
    pub allowed: &'static [Role],
}

/// Resolve the bearer token into an identity and attach it to the request.
///
/// Header problems fail before any external call is made.
pub async fn authenticate(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(req.headers()) {
        Ok(token) => token.to_string(),
        Err(msg) => return errors::respond(&AppError::unauthorized(msg)),
    };

    match state.identity.resolve(&token).await {
        Ok(identity) => {
            req.extensions_mut().insert(CurrentUser(identity));
            next.run(req).await
        }
        Err(err) => errors::respond(&AppError::from(err)),
    }
}

/// Check the attached identity against the route's allowed roles. Must
/// run after [`authenticate`].
pub async fn authorize(State(roles): State<RoleState>, req: Request, next: Next) -> Response {
    let identity: Option<&Identity> = req.extensions().get::<CurrentUser>().map(|u| &u.0);
    match videoclub_auth::require_role(identity, roles.allowed) {
        Ok(()) => next.run(req).await,
        Err(GateError::Unauthenticated) => {
            // Reaching this without an identity means the auth middleware
            // did not run first; report it as a plain 401 either way.
            errors::respond(&AppError::unauthorized(messages::UNAUTHORIZED))
        }
        Err(GateError::Forbidden) => errors::respond(&AppError::forbidden(messages::FORBIDDEN)),
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("Token no proporcionado. Usa: Authorization: Bearer <token>")?;

    let header = header.to_str().map_err(|_| "Token mal formado")?;
    let token = header.strip_prefix("Bearer ").ok_or("Token mal formado")?.trim();

    if token.is_empty() {
        return Err("Token mal formado");
    }
    Ok(token)
}
