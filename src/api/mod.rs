//! REST API module.
//!
//! Handlers call exactly one repository operation and shape its result:
//! a value becomes `200` with a JSON body, [`Lookup::NotFound`] becomes an
//! empty `204`. Empty mappings from filters are values, so they answer `200 {}`.

mod posts;
mod tags;

pub use posts::*;
pub use tags::*;

use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::AppError;
use crate::repo::Lookup;

/// Successful handler outcome.
#[derive(Debug)]
pub enum Reply<T> {
    Ok(T),
    NoContent,
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        match self {
            Reply::Ok(body) => (StatusCode::OK, Json(body)).into_response(),
            Reply::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

impl<T> From<Lookup<T>> for Reply<T> {
    fn from(lookup: Lookup<T>) -> Self {
        match lookup {
            Lookup::Found(value) => Reply::Ok(value),
            Lookup::NotFound => Reply::NoContent,
        }
    }
}

/// Response type that can be either a reply or an error.
pub type ApiResult<T> = Result<Reply<T>, AppError>;

/// Create a `200` response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Reply::Ok(data))
}

/// `200` when found, `204` otherwise.
pub fn found_or_empty<T: Serialize>(lookup: Lookup<T>) -> ApiResult<T> {
    Ok(lookup.into())
}

/// JSON body extractor that reports malformed or unexpected payloads as
/// `400 VALIDATION_ERROR` using the standard error envelope.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!("Rejected payload: {}", rejection.body_text());
                Err(AppError::Validation(rejection.body_text()))
            }
        }
    }
}
