use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::{error::ApiError, requests::Validate};

/// JSON body that is deserialized and then validated.
///
/// Both failures become `400 {error}` instead of axum's plain-text 415/422.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}
