// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport-level error type for the service client.

use thiserror::Error;

/// An error produced by a single call to the writing-assistant service.
///
/// Callers are expected to translate this into a user-facing
/// [`penna_core::PennaError`]; the session store's request wrapper does so
/// and routes [`ApiError::Unauthorized`] through the forced-logout path.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    /// The service rejected the credential (HTTP 401).
    #[error("unauthorized: {}", detail.as_deref().unwrap_or("credential rejected"))]
    Unauthorized {
        /// The server's `detail` text, when the body carried one.
        detail: Option<String>,
    },

    /// The service reported a business or validation failure.
    #[error("service returned {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Service {
        status: u16,
        /// The server's `detail` text, when the body carried one.
        detail: Option<String>,
    },

    /// A 2xx response whose body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}
