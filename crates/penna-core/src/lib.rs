// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Penna writing-assistant client.
//!
//! This crate provides the error type and domain types shared by the
//! Penna workspace: the authenticated session, writing samples, the
//! derived style profile, generated artifacts with their feedback state,
//! and the read-only history/stats projections.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PennaError;
pub use types::{
    Artifact, FeedbackKind, FeedbackState, GenerationStats, HistoryEntry, Session, StyleProfile,
    WritingSample,
};
