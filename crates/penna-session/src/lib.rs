// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session lifecycle for the Penna client.
//!
//! [`SessionStore`] owns the authenticated session and its durable cache,
//! exposes login/signup/logout and startup restoration, and provides the
//! authenticated-request wrapper ([`SessionStore::request`]) that every
//! other component must go through. A server response rejecting the
//! credential forces a logout before the caller sees the error, so
//! dependents observe "unauthenticated" immediately via [`SessionStore::subscribe`].

pub mod cache;
pub mod store;

pub use cache::{CachedIdentity, SessionCache};
pub use store::SessionStore;
