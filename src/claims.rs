// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and their self-validation rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Identity claims carried in a signed token.
///
/// Standard registered claims plus the two domain fields (`user_id`,
/// `phone`). Claims are plain data: they are built up before signing and
/// treated as read-only once parsed out of a verified token. Timestamps are
/// Unix seconds, matching the JWT wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Expiration time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Not before
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Issued at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Token ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Canonical user identifier
    pub user_id: String,
    /// User's phone number
    pub phone: String,
}

impl Claims {
    /// Create claims for a user with no expiry set.
    ///
    /// The expiry is stamped by [`crate::TokenCodec::sign`]; claims without
    /// one never pass [`Claims::validate_expiry`].
    pub fn new(user_id: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            iss: None,
            sub: None,
            aud: None,
            exp: None,
            nbf: None,
            iat: None,
            jti: None,
            user_id: user_id.into(),
            phone: phone.into(),
        }
    }

    /// Set the expiration time, in place.
    pub fn set_expiry(&mut self, expires_at: DateTime<Utc>) {
        self.exp = Some(expires_at.timestamp());
    }

    /// Check that an expiration is set and strictly in the future.
    ///
    /// "No expiration" and "expired" are distinct failures so operators can
    /// tell a mis-minted token from a stale one.
    pub fn validate_expiry(&self, now: DateTime<Utc>) -> Result<(), AuthError> {
        match self.exp {
            None => Err(AuthError::MissingExpiry),
            Some(exp) if exp <= now.timestamp() => Err(AuthError::TokenExpired),
            Some(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_claims() -> Claims {
        let mut claims = Claims::new("user_123", "+2348012345678");
        claims.set_expiry(Utc::now() + Duration::hours(24));
        claims
    }

    #[test]
    fn future_expiry_is_valid() {
        let claims = sample_claims();
        assert!(claims.validate_expiry(Utc::now()).is_ok());
    }

    #[test]
    fn missing_expiry_is_rejected() {
        let claims = Claims::new("user_123", "+2348012345678");
        let err = claims.validate_expiry(Utc::now()).unwrap_err();
        assert!(matches!(err, AuthError::MissingExpiry));
    }

    #[test]
    fn past_expiry_is_rejected() {
        let mut claims = sample_claims();
        claims.set_expiry(Utc::now() - Duration::minutes(5));
        let err = claims.validate_expiry(Utc::now()).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn expiry_equal_to_now_is_rejected() {
        let now = Utc::now();
        let mut claims = sample_claims();
        claims.set_expiry(now);
        let err = claims.validate_expiry(now).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn unset_registered_claims_are_omitted_from_json() {
        let claims = sample_claims();
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("iss").is_none());
        assert!(json.get("nbf").is_none());
        assert_eq!(json["user_id"], "user_123");
        assert_eq!(json["phone"], "+2348012345678");
    }

    #[test]
    fn json_round_trip_preserves_claims() {
        let claims = sample_claims();
        let json = serde_json::to_string(&claims).unwrap();
        let back: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(back, claims);
    }
}
