// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Penna client crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// An authenticated session: identity plus the bearer credential.
///
/// Owned exclusively by the session store. Credential and identity are
/// always set and cleared together, never one without the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    pub email: String,
    /// Opaque bearer token returned by login/signup.
    pub credential: String,
    pub established_at: DateTime<Utc>,
}

/// A writing sample uploaded for style analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritingSample {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub uploaded_at: DateTime<Utc>,
    /// Set by the service once the sample has been included in an analysis run.
    pub analyzed: bool,
}

/// The derived style profile. Its presence is the sole readiness signal
/// for content generation; it is replaced wholesale on each analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    pub owner_id: i64,
    pub vocabulary_level: String,
    pub formality_preference: String,
    pub sentence_complexity: f64,
    pub sample_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A feedback action the user can take on a generated artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FeedbackKind {
    Accepted,
    Rejected,
    Modified,
}

/// The recorded feedback state of the current artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackState {
    #[default]
    Unrated,
    Accepted,
    Rejected,
    Modified,
}

impl From<FeedbackKind> for FeedbackState {
    fn from(kind: FeedbackKind) -> Self {
        match kind {
            FeedbackKind::Accepted => FeedbackState::Accepted,
            FeedbackKind::Rejected => FeedbackState::Rejected,
            FeedbackKind::Modified => FeedbackState::Modified,
        }
    }
}

/// One generated piece of content plus its feedback and edit outcome.
///
/// Exactly one artifact is current at a time; it is created only from a
/// successful generation call and discarded by the next generation or an
/// explicit clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Assigned by the service; required before any feedback call.
    pub id: i64,
    pub prompt: String,
    pub context: String,
    pub content: String,
    pub feedback: FeedbackState,
    /// Present once a `Modified` feedback has been accepted by the service.
    pub edited_content: Option<String>,
}

impl Artifact {
    /// The content the user should see: the accepted modification when one
    /// exists, otherwise the generated text.
    pub fn display_content(&self) -> &str {
        self.edited_content.as_deref().unwrap_or(&self.content)
    }
}

/// A read-only generation-history record fetched from the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub prompt: String,
    pub generated_text: String,
    pub user_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub has_modifications: bool,
}

/// Aggregate generation counters fetched from the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub total_generations: i64,
    pub accepted: i64,
    pub modified: i64,
    pub rejected: i64,
    pub acceptance_rate: f64,
    pub modification_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn feedback_kind_wire_names_are_lowercase() {
        assert_eq!(FeedbackKind::Accepted.to_string(), "accepted");
        assert_eq!(FeedbackKind::Rejected.to_string(), "rejected");
        assert_eq!(FeedbackKind::Modified.to_string(), "modified");
    }

    #[test]
    fn feedback_kind_parses_user_input() {
        assert_eq!(
            FeedbackKind::from_str("accepted").unwrap(),
            FeedbackKind::Accepted
        );
        assert_eq!(
            FeedbackKind::from_str("Modified").unwrap(),
            FeedbackKind::Modified
        );
        assert!(FeedbackKind::from_str("meh").is_err());
    }

    #[test]
    fn feedback_state_defaults_to_unrated() {
        assert_eq!(FeedbackState::default(), FeedbackState::Unrated);
    }

    #[test]
    fn kind_converts_to_matching_state() {
        assert_eq!(
            FeedbackState::from(FeedbackKind::Rejected),
            FeedbackState::Rejected
        );
    }

    #[test]
    fn display_content_prefers_edited_text() {
        let mut artifact = Artifact {
            id: 1,
            prompt: "a note".into(),
            context: "general".into(),
            content: "generated".into(),
            feedback: FeedbackState::Unrated,
            edited_content: None,
        };
        assert_eq!(artifact.display_content(), "generated");

        artifact.edited_content = Some("edited".into());
        assert_eq!(artifact.display_content(), "edited");
    }

    #[test]
    fn session_round_trips_through_serde() {
        let session = Session {
            user_id: 7,
            email: "a@b.c".into(),
            credential: "tok".into(),
            established_at: Utc::now(),
        };
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(session, back);
    }
}
