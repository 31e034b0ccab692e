// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Penna client.

use thiserror::Error;

/// The primary error type used across the Penna client crates.
///
/// Every variant resolves to a displayable message and a well-defined
/// state; nothing in the client treats an error as fatal to the process.
#[derive(Debug, Error)]
pub enum PennaError {
    /// Local input validation failed. Never reaches the network.
    #[error("{0}")]
    Validation(String),

    /// A readiness precondition is missing (no style profile yet).
    #[error("{0}")]
    NotReady(String),

    /// An authenticated call was attempted with no active session.
    #[error("You are not logged in.")]
    NotAuthenticated,

    /// The server rejected the credential; the session has been invalidated.
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// The service reported a business or validation failure.
    #[error("{message}")]
    Service { message: String },

    /// The service could not be reached or the connection failed mid-request.
    #[error("Unable to reach the server. Please check your connection.")]
    Network {
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid TOML, bad base URL, missing fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors (malformed service responses, etc.).
    #[error("internal error: {0}")]
    Internal(String),
}
