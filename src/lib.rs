// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token Guard - Bearer Token Authentication
//!
//! This crate provides RSA-signed bearer token authentication for services:
//! key-material normalization, an RS256 token codec, claims propagation
//! through request context, and axum middleware enforcing two access tiers
//! (authenticated and restricted).
//!
//! ## Auth Flow
//!
//! 1. A service mints a token with [`TokenCodec::sign`] (or
//!    [`TokenCodec::issue`]) at login
//! 2. Clients send `Authorization: Bearer <token>`
//! 3. [`require_auth`] / [`require_restricted`] verify the token, bind the
//!    claims onto the request context, and forward or reject with a 401
//!    envelope
//! 4. Handlers read the caller's identity via the [`Auth`] extractor;
//!    outbound calls re-carry the same serialized claims via [`Metadata`]
//!
//! ## Modules
//!
//! - `keys` - PEM/base64 key material normalization
//! - `claims` - identity payload and its expiry validation
//! - `token` - RS256 signing and verification
//! - `propagation` - claims carriage across request/call boundaries
//! - `middleware` - access enforcement (standard + restricted)
//! - `extractor` - handler-side claims extractor
//! - `error` - error kinds and the HTTP error envelope
//! - `config` - environment variable names and defaults

pub mod claims;
pub mod config;
pub mod error;
pub mod extractor;
pub mod keys;
pub mod middleware;
pub mod propagation;
pub mod token;

pub use claims::Claims;
pub use error::{AuthError, KeySide};
pub use extractor::Auth;
pub use middleware::{require_auth, require_restricted, AuthState, PrivilegeCheck};
pub use propagation::{ClaimsPropagator, Metadata};
pub use token::TokenCodec;
