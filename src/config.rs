// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used by
//! embedding services. The library itself reads nothing from the environment;
//! services load these at startup and pass the values into [`crate::TokenCodec`]
//! and [`crate::ClaimsPropagator`] explicitly.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `TOKEN_PUBLIC_KEY` | RSA public key, PEM or single-line base64 DER | Required |
//! | `TOKEN_PRIVATE_KEY` | RSA private key, PEM or single-line base64 DER | Required |
//! | `CLAIMS_METADATA_KEY` | Metadata key claims travel under | `authenticated-user` |

/// Environment variable name for the RSA public key.
///
/// Deployment secret stores often strip PEM framing and deliver the key as a
/// single base64 line; both forms are accepted (see [`crate::keys`]).
pub const TOKEN_PUBLIC_KEY_ENV: &str = "TOKEN_PUBLIC_KEY";

/// Environment variable name for the RSA private key.
///
/// Same format rules as [`TOKEN_PUBLIC_KEY_ENV`].
pub const TOKEN_PRIVATE_KEY_ENV: &str = "TOKEN_PRIVATE_KEY";

/// Environment variable name for the claims metadata key.
///
/// Overrides [`DEFAULT_CLAIMS_METADATA_KEY`] when set. Every service in a
/// deployment must agree on this value or downstream claim extraction fails.
pub const CLAIMS_METADATA_KEY_ENV: &str = "CLAIMS_METADATA_KEY";

/// Default metadata key that serialized claims travel under.
///
/// Lowercase so the same name is valid as an HTTP header or gRPC metadata
/// key when claims cross a process boundary.
pub const DEFAULT_CLAIMS_METADATA_KEY: &str = "authenticated-user";
