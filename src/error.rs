// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors and the HTTP error envelope.
//!
//! Every failure in this crate surfaces as an [`AuthError`]. At the HTTP
//! boundary all verification failures collapse to a uniform 401 so a caller
//! cannot probe which individual check rejected their token; the variants
//! stay distinct internally for logs and for callers of the library API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

/// Authentication error type.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("no token in authorization header")]
    MissingAuthHeader,
    /// Authorization header does not split into exactly two parts
    #[error("malformed token in authorization header")]
    MalformedAuthHeader,
    /// Bearer scheme present but the token value is empty
    #[error("empty token in authorization header")]
    EmptyToken,
    /// Key material is not valid PEM or base64 DER
    #[error("failed to decode key material: {0}")]
    KeyDecode(String),
    /// Key material decoded but did not parse as an RSA key
    #[error("failed to parse {which} key: {reason}")]
    KeyParse { which: KeySide, reason: String },
    /// Signing operation failure
    #[error("failed to sign token: {0}")]
    Signing(String),
    /// Token structure is not a well-formed JWT
    #[error("malformed token")]
    MalformedToken,
    /// Token was signed with an algorithm other than RS256
    #[error("invalid signing algorithm")]
    AlgorithmMismatch,
    /// Token signature is invalid
    #[error("invalid token signature")]
    InvalidSignature,
    /// Token has expired
    #[error("token has expired")]
    TokenExpired,
    /// Claims carry no expiration at all
    #[error("expiration time is not set")]
    MissingExpiry,
    /// Claims could not be serialized for context binding
    #[error("failed to bind claims to context: {0}")]
    ClaimsBind(String),
    /// No claims bound under the propagator's metadata key
    #[error("no authenticated user claims on context")]
    ClaimsNotFound,
    /// Bound claims value could not be deserialized
    #[error("failed to decode authenticated user claims")]
    ClaimsDecode,
    /// Privilege predicate rejected the claims (restricted endpoints)
    #[error("user does not have authorization to access this endpoint")]
    RestrictedAccess,
}

/// Which half of the key pair failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySide {
    Public,
    Private,
}

impl std::fmt::Display for KeySide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySide::Public => write!(f, "public"),
            KeySide::Private => write!(f, "private"),
        }
    }
}

/// Error body rendered inside the `{"data": ...}` envelope.
#[derive(Serialize)]
struct AuthErrorBody {
    error_reference: Uuid,
    error_code: u16,
    error_type: &'static str,
    message: String,
}

/// Envelope wrapper: every error response body is `{"data": <error body>}`.
#[derive(Serialize)]
struct Envelope {
    data: AuthErrorBody,
}

impl AuthError {
    /// Get the numeric error code for this error.
    pub fn error_code(&self) -> u16 {
        match self {
            AuthError::ClaimsNotFound | AuthError::ClaimsDecode => 1003,
            AuthError::ClaimsBind(_) => 1004,
            AuthError::KeyDecode(_) | AuthError::KeyParse { .. } | AuthError::Signing(_) => 1013,
            AuthError::MalformedToken
            | AuthError::AlgorithmMismatch
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::MissingExpiry => 1014,
            AuthError::MissingAuthHeader
            | AuthError::MalformedAuthHeader
            | AuthError::EmptyToken => 1019,
            AuthError::RestrictedAccess => 1044,
        }
    }

    /// Get the error type label for this error.
    pub fn error_type(&self) -> &'static str {
        match self.error_code() {
            1003 => "UnmarshalError",
            1004 => "MarshalError",
            1013 => "TokenGenerationError",
            1014 => "TokenValidationError",
            1044 => "RestrictedAccessError",
            _ => "ErrorUnauthorized",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::RestrictedAccess => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(Envelope {
            data: AuthErrorBody {
                error_reference: Uuid::new_v4(),
                error_code: self.error_code(),
                error_type: self.error_type(),
                message: self.to_string(),
            },
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_header_returns_401_envelope() {
        let response = AuthError::MissingAuthHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["data"]["error_code"], 1019);
        assert_eq!(body["data"]["error_type"], "ErrorUnauthorized");
        assert_eq!(body["data"]["message"], "no token in authorization header");
        assert!(body["data"]["error_reference"].is_string());
    }

    #[tokio::test]
    async fn restricted_access_returns_403() {
        let response = AuthError::RestrictedAccess.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["data"]["error_code"], 1044);
        assert_eq!(body["data"]["error_type"], "RestrictedAccessError");
    }

    #[test]
    fn verification_failures_share_a_validation_code() {
        for err in [
            AuthError::MalformedToken,
            AuthError::AlgorithmMismatch,
            AuthError::InvalidSignature,
            AuthError::TokenExpired,
            AuthError::MissingExpiry,
        ] {
            assert_eq!(err.error_code(), 1014);
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn key_parse_names_the_failing_side() {
        let err = AuthError::KeyParse {
            which: KeySide::Private,
            reason: "InvalidKeyFormat".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse private key: InvalidKeyFormat"
        );
    }
}
