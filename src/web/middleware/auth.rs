//! Bearer authentication middleware.
//!
//! [`inject_gate`] places the shared [`AccessGate`] in the request
//! extensions; the [`AuthUser`] extractor then resolves the principal for
//! handlers that require one. Public handlers simply don't ask for it.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{AccessGate, Principal};
use crate::web::error::ApiError;

/// Extractor for authenticated users.
///
/// Rejects with 401 when the token is missing, malformed, expired, signed
/// with another key, or names a user that no longer exists.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let gate = parts
            .extensions
            .get::<Arc<AccessGate>>()
            .cloned()
            .ok_or_else(|| ApiError::internal("Access gate not configured"))?;

        // A header that is not visible ASCII is malformed, not missing.
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| value.to_str().unwrap_or_default());

        let principal = gate.authenticate(header).await.map_err(|e| {
            tracing::debug!("Authentication failed: {}", e);
            ApiError::from(e)
        })?;

        Ok(AuthUser(principal))
    }
}

/// Middleware function to inject the access gate into request extensions.
pub async fn inject_gate(gate: Arc<AccessGate>, mut request: Request<Body>, next: Next) -> Response {
    request.extensions_mut().insert(gate);
    next.run(request).await
}
