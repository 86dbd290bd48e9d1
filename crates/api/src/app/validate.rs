//! Validated-body extractor.
//!
//! Each request DTO declares its schema as a `validate()` that checks
//! every field and reports **all** violations at once, comma-joined.
//! Deserializing into the typed DTO drops undeclared fields, so the
//! validated output is also the sanitized body.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    response::Response,
    Json,
};
use serde::de::DeserializeOwned;

use videoclub_core::AppError;

use crate::app::errors;

/// Accumulator for schema violations.
#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn join(&self) -> String {
        self.0.join(", ")
    }

    /// Finish a schema check: the sanitized value, or everything that
    /// went wrong.
    pub fn finish<T>(self, value: T) -> Result<T, Violations> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// A request body with a declarative validation step.
pub trait ValidateBody: DeserializeOwned {
    type Output;

    fn validate(self) -> Result<Self::Output, Violations>;
}

/// Extractor that deserializes, validates and sanitizes a JSON body
/// before the handler sees it.
pub struct Validated<T: ValidateBody>(pub T::Output);

#[async_trait]
impl<S, T> FromRequest<S> for Validated<T>
where
    T: ValidateBody,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| errors::respond(&AppError::validation(rejection.body_text())))?;

        let output = body
            .validate()
            .map_err(|violations| errors::respond(&AppError::validation(violations.join())))?;

        Ok(Validated(output))
    }
}
