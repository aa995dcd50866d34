//! Authenticated actor extraction.
//!
//! Session verification happens upstream; the verified user id arrives in the
//! `x-user-id` header. Ledger routes refuse requests that do not carry it.

use crate::errors::Error;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Header carrying the authenticated user id
pub const ACTOR_HEADER: &str = "x-user-id";

/// The user performing the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Self(value.to_string()))
            .ok_or(Error::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<Actor, Error> {
        let (mut parts, ()) = request.into_parts();
        Actor::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_actor_from_header() {
        let request = Request::builder()
            .header(ACTOR_HEADER, " agent-7 ")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.unwrap(), Actor("agent-7".to_string()));
    }

    #[tokio::test]
    async fn test_missing_or_blank_actor_rejected() {
        let request = Request::builder().body(()).unwrap();
        assert!(matches!(extract(request).await, Err(Error::Unauthenticated)));

        let request = Request::builder()
            .header(ACTOR_HEADER, "   ")
            .body(())
            .unwrap();
        assert!(matches!(extract(request).await, Err(Error::Unauthenticated)));
    }
}
