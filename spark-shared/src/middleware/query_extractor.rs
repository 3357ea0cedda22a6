use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use validator::Validate;

use crate::errors::AppError;

/// The calling user, read from the mandatory `user_id` query parameter.
///
/// There is no default actor: a request without `user_id` is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub i64);

#[derive(Debug, Deserialize)]
struct ActorParams {
    user_id: Option<i64>,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<ActorParams>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::invalid_argument(format!("invalid user_id: {}", e.body_text())))?;

        params
            .user_id
            .map(Actor)
            .ok_or_else(|| AppError::invalid_argument("user_id is required"))
    }
}

/// Query string extractor that runs `validator` rules and reports failures in
/// the standard error envelope instead of axum's plain-text rejection.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::invalid_argument(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::invalid_argument(e.to_string()))?;

        Ok(Self(value))
    }
}
