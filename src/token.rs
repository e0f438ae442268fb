// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RS256 token signing and verification.
//!
//! [`TokenCodec`] holds the deployment's RSA key pair, fixed at
//! construction. Construction either yields a codec with both keys parsed
//! or fails outright; there is no half-initialized state. After that the
//! codec is immutable, so concurrent `sign`/`parse` calls need no locking.

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use crate::claims::Claims;
use crate::error::{AuthError, KeySide};
use crate::keys::{ensure_pem, PemBlock};

/// Signs and verifies RS256 bearer tokens with a fixed RSA key pair.
#[derive(Debug)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec from public and private key material.
    ///
    /// Each key may be PEM text or single-line base64 DER (see
    /// [`crate::keys::ensure_pem`]). Errors name which key failed.
    pub fn new(public_key: &str, private_key: &str) -> Result<Self, AuthError> {
        let pub_pem = normalize(public_key, PemBlock::PublicKey, KeySide::Public)?;
        let priv_pem = normalize(private_key, PemBlock::PrivateKey, KeySide::Private)?;

        let decoding_key = DecodingKey::from_rsa_pem(pub_pem.as_bytes()).map_err(|e| {
            AuthError::KeyParse {
                which: KeySide::Public,
                reason: e.to_string(),
            }
        })?;
        let encoding_key = EncodingKey::from_rsa_pem(priv_pem.as_bytes()).map_err(|e| {
            AuthError::KeyParse {
                which: KeySide::Private,
                reason: e.to_string(),
            }
        })?;

        // Expiry is checked by Claims::validate_expiry so that "expired" and
        // "no expiration set" stay distinguishable.
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = false;
        validation.required_spec_claims.remove("exp");
        validation.validate_aud = false;

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Sign claims into a compact token string expiring at `expires_at`.
    ///
    /// This is the only minting path; callers always supply the expiry.
    pub fn sign(&self, mut claims: Claims, expires_at: DateTime<Utc>) -> Result<String, AuthError> {
        claims.set_expiry(expires_at);
        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Mint a token for a user directly from their identity fields.
    pub fn issue(
        &self,
        phone: &str,
        user_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        self.sign(Claims::new(user_id, phone), expires_at)
    }

    /// Parse and verify a signed token string.
    ///
    /// Rejects tokens whose header declares anything but RS256 before
    /// signature verification, then verifies the signature, then runs the
    /// claims' own expiry validation. Only a token passing all three checks
    /// yields claims.
    pub fn parse(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => AuthError::AlgorithmMismatch,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::MalformedToken,
            }
        })?;

        data.claims.validate_expiry(Utc::now())?;
        Ok(data.claims)
    }
}

fn normalize(key: &str, block: PemBlock, which: KeySide) -> Result<String, AuthError> {
    ensure_pem(key, block).map_err(|e| match e {
        AuthError::KeyDecode(msg) => AuthError::KeyDecode(format!("{which} key: {msg}")),
        other => other,
    })
}
