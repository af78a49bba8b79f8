use crate::routes::error::QuizError;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::Json;
use http::request::Parts;
use serde::de::DeserializeOwned;

/// [`Query`] that rejects with a [`QuizError`], so clients get the json error body.
#[derive(Debug, Clone)]
pub(crate) struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = QuizError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| QuizError::InvalidRequest(rejection.body_text()))?;
        Ok(Self(params))
    }
}

/// [`Json`] that rejects with a [`QuizError`].
#[derive(Debug, Clone)]
pub(crate) struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = QuizError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| QuizError::InvalidRequest(rejection.body_text()))?;
        Ok(Self(body))
    }
}
