// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access middleware for Axum.
//!
//! Two variants over one shared extraction routine:
//!
//! - [`require_auth`] - any valid bearer token is forwarded.
//! - [`require_restricted`] - additionally asserts the privilege predicate
//!   configured on [`AuthState`].
//!
//! Apply with `axum::middleware::from_fn_with_state`:
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/orders", get(list_orders))
//!     .layer(middleware::from_fn_with_state(auth_state.clone(), require_auth))
//!     .with_state(auth_state);
//! ```
//!
//! Every rejection short-circuits the handler chain with the uniform
//! `{"data": ...}` error envelope; no partial processing happens after a
//! rejection.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::claims::Claims;
use crate::error::AuthError;
use crate::propagation::{ClaimsPropagator, Metadata};
use crate::token::TokenCodec;

/// Privilege predicate for restricted endpoints.
///
/// The embedding service supplies the policy; this crate only plumbs the
/// verified claims to it.
pub type PrivilegeCheck = Arc<dyn Fn(&Claims) -> bool + Send + Sync>;

/// Shared state for the access middleware.
#[derive(Clone)]
pub struct AuthState {
    codec: Arc<TokenCodec>,
    propagator: ClaimsPropagator,
    privilege: Option<PrivilegeCheck>,
}

impl AuthState {
    /// Create middleware state from a codec and propagator.
    pub fn new(codec: Arc<TokenCodec>, propagator: ClaimsPropagator) -> Self {
        Self {
            codec,
            propagator,
            privilege: None,
        }
    }

    /// Set the privilege predicate used by [`require_restricted`].
    ///
    /// Without one, every restricted request is rejected (fail-closed).
    pub fn with_privilege_check(
        mut self,
        check: impl Fn(&Claims) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.privilege = Some(Arc::new(check));
        self
    }

    /// The token codec.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// The claims propagator.
    pub fn propagator(&self) -> &ClaimsPropagator {
        &self.propagator
    }
}

/// Middleware for authenticated endpoints: verify the bearer token and bind
/// its claims onto the request context.
pub async fn require_auth(
    State(auth): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    authorize(&auth, request, next, false).await
}

/// Middleware for restricted endpoints: verify the bearer token, assert the
/// privilege predicate, and bind claims onto the request context.
pub async fn require_restricted(
    State(auth): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    authorize(&auth, request, next, true).await
}

/// Shared extraction routine behind both middleware variants.
async fn authorize(
    auth: &AuthState,
    mut request: Request,
    next: Next,
    restricted: bool,
) -> Response {
    let header = match request.headers().get(AUTHORIZATION) {
        Some(value) => match value.to_str() {
            Ok(s) if !s.is_empty() => s.to_owned(),
            Ok(_) => return AuthError::MissingAuthHeader.into_response(),
            Err(_) => return AuthError::MalformedAuthHeader.into_response(),
        },
        None => return AuthError::MissingAuthHeader.into_response(),
    };

    // Exactly "<scheme> <token>"; anything else is malformed.
    let parts: Vec<&str> = header.split(' ').collect();
    if parts.len() != 2 {
        return AuthError::MalformedAuthHeader.into_response();
    }
    if parts[1].is_empty() {
        warn!("bearer token is empty");
        return AuthError::EmptyToken.into_response();
    }

    let claims = match auth.codec.parse(parts[1]) {
        Ok(claims) => claims,
        Err(err) => {
            warn!(error = %err, "unable to parse token string");
            return err.into_response();
        }
    };

    if restricted {
        let allowed = auth
            .privilege
            .as_ref()
            .is_some_and(|check| check(&claims));
        if !allowed {
            warn!(user_id = %claims.user_id, "restricted access denied");
            return AuthError::RestrictedAccess.into_response();
        }
    }

    // Bind onto whatever metadata the request already carries; the bound
    // copy replaces it in the extensions (rebinding overwrites).
    let metadata = request
        .extensions()
        .get::<Metadata>()
        .cloned()
        .unwrap_or_default();
    let bound = match auth.propagator.bind(&metadata, &claims) {
        Ok(bound) => bound,
        Err(err) => {
            warn!(error = %err, "unable to put claims on context");
            return err.into_response();
        }
    };
    request.extensions_mut().insert(bound);

    next.run(request).await
}
