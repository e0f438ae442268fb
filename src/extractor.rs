// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for claims bound by the access middleware.
//!
//! Use the `Auth` extractor in handlers behind [`crate::require_auth`] or
//! [`crate::require_restricted`]:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(claims): Auth) -> impl IntoResponse {
//!     // claims.user_id identifies the caller
//! }
//! ```

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::claims::Claims;
use crate::error::AuthError;
use crate::middleware::AuthState;
use crate::propagation::Metadata;

/// Extractor for the authenticated caller's claims.
///
/// Reads the [`Metadata`] the middleware bound into the request extensions
/// and decodes the claims out of it. Rejects with the 401 envelope when no
/// binding is present, which means the route is not behind the auth
/// middleware.
pub struct Auth(pub Claims);

impl<S> FromRequestParts<S> for Auth
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);
        let metadata = parts
            .extensions
            .get::<Metadata>()
            .ok_or(AuthError::ClaimsNotFound)?;
        let claims = auth.propagator().extract(metadata)?;
        Ok(Auth(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::ClaimsPropagator;
    use crate::token::TokenCodec;
    use axum::http::Request;
    use std::sync::Arc;

    fn test_state() -> AuthState {
        let codec = TokenCodec::new(
            include_str!("../testdata/rsa_test_key.pub.pem"),
            include_str!("../testdata/rsa_test_key.pem"),
        )
        .unwrap();
        AuthState::new(Arc::new(codec), ClaimsPropagator::default())
    }

    fn request_parts() -> Parts {
        Request::builder().uri("/test").body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn extracts_claims_bound_by_middleware() {
        let state = test_state();
        let mut parts = request_parts();

        let claims = Claims::new("user_123", "+2348012345678");
        let bound = state
            .propagator()
            .bind(&Metadata::new(), &claims)
            .unwrap();
        parts.extensions.insert(bound);

        let Auth(extracted) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(extracted, claims);
    }

    #[tokio::test]
    async fn rejects_when_nothing_is_bound() {
        let state = test_state();
        let mut parts = request_parts();

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::ClaimsNotFound)));
    }

    #[tokio::test]
    async fn rejects_undecodable_binding() {
        let state = test_state();
        let mut parts = request_parts();
        parts
            .extensions
            .insert(Metadata::new().with(state.propagator().key(), "{broken"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::ClaimsDecode)));
    }
}
