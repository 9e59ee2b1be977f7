//! Extractors whose rejections use the JSON error body.

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequest, FromRequestParts, Path};
use serde::Deserialize;

use crate::error::AppError;

/// Request body parsed as JSON. Malformed or mistyped bodies are a 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Payload<T>(pub T);

/// Numeric `{id}` path segment. Anything else is a 400.
#[derive(Debug, Clone, Copy, Deserialize, FromRequestParts)]
#[serde(transparent)]
#[from_request(via(Path), rejection(AppError))]
pub struct PathId(pub i32);

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
