// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application state for the Penna client: the sample readiness gate, the
//! generation-feedback controller, and the advisory history/stats
//! projection.
//!
//! Control flows top-down: a user action hits a controller, the controller
//! issues remote calls through the session store's authenticated-request
//! wrapper, state mutates only once a call resolves, and every
//! state-changing success triggers a projection refresh. The only reverse
//! flow is the forced-logout signal published by the session store when any
//! call detects an invalidated credential.

pub mod generation;
pub mod projection;
pub mod samples;

pub use generation::{EditMode, GenerationController};
pub use projection::HistoryProjection;
pub use samples::{SampleGate, MIN_SAMPLE_CHARS};
