// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Penna writing-assistant service.
//!
//! Provides [`ApiClient`] (request construction, bearer authentication,
//! status-driven error mapping) and the wire types the service exchanges.
//! Authorization handling lives one layer up: the session store's request
//! wrapper translates [`ApiError::Unauthorized`] into a forced logout.

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
