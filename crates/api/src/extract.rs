use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use gateway::Credential;

use crate::error::ApiError;

/// Extracts the caller's `Authorization` header before any handler logic
/// runs. Presence is required; the value itself is passed through verbatim
/// and left for upstream to accept or reject.
pub struct Caller(pub Credential);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::unauthorized("missing Authorization header"))?;
        let value = value
            .to_str()
            .map_err(|_| ApiError::unauthorized("malformed Authorization header"))?;
        Ok(Self(Credential::new(value)))
    }
}
