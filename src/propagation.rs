// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Claims propagation across request and call boundaries.
//!
//! Verified claims travel as an opaque JSON blob under a single metadata
//! key. One encoding, two carriers: in-process the [`Metadata`] value rides
//! in `http::Extensions`; across a process boundary the same key/value pair
//! is copied into outbound call metadata (HTTP or gRPC headers).
//!
//! Binding never mutates a context in place. [`ClaimsPropagator::bind`]
//! returns a derived [`Metadata`] value, so concurrent requests sharing a
//! parent context never observe each other's bindings.

use std::collections::BTreeMap;

use crate::claims::Claims;
use crate::config::DEFAULT_CLAIMS_METADATA_KEY;
use crate::error::AuthError;

/// String-keyed request metadata.
///
/// A small immutable-by-convention map: every write path returns a derived
/// value instead of mutating the receiver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    /// Empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Derive a new metadata value with `key` set to `value`.
    ///
    /// An existing entry under the same key is replaced in the derived
    /// value; the receiver is untouched.
    pub fn with(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = self.0.clone();
        entries.insert(key.into(), value.into());
        Self(entries)
    }

    /// Iterate over entries, for projection into outbound carrier headers.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Serializes claims into [`Metadata`] and back.
///
/// The metadata key is explicit configuration: every service in a
/// deployment constructs its propagator with the same key (see
/// [`crate::config`]).
#[derive(Debug, Clone)]
pub struct ClaimsPropagator {
    key: String,
}

impl ClaimsPropagator {
    /// Create a propagator carrying claims under `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// The metadata key claims travel under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Bind claims into a derived metadata value.
    pub fn bind(&self, metadata: &Metadata, claims: &Claims) -> Result<Metadata, AuthError> {
        let json = serde_json::to_string(claims).map_err(|e| AuthError::ClaimsBind(e.to_string()))?;
        Ok(metadata.with(&self.key, json))
    }

    /// Extract previously bound claims.
    ///
    /// Fails with [`AuthError::ClaimsNotFound`] when nothing is bound and
    /// [`AuthError::ClaimsDecode`] when the stored blob does not
    /// deserialize; a success is always a fully materialized [`Claims`].
    pub fn extract(&self, metadata: &Metadata) -> Result<Claims, AuthError> {
        let json = metadata.get(&self.key).ok_or(AuthError::ClaimsNotFound)?;
        serde_json::from_str(json).map_err(|_| AuthError::ClaimsDecode)
    }
}

impl Default for ClaimsPropagator {
    fn default() -> Self {
        Self::new(DEFAULT_CLAIMS_METADATA_KEY)
    }
}
