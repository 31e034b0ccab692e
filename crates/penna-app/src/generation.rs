// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The generation-feedback controller: the prompt -> artifact -> feedback
//! cycle, including the editing sub-mode and toggle-clear semantics.
//!
//! Feedback state machine: `{Unrated, Accepted, Rejected, Modified}`.
//! Submitting the kind already recorded is a local clear back to `Unrated`
//! (no remote call); every other transition goes through the service, and a
//! failed transition rolls back to `Unrated`, never to the prior value. The
//! machine resets whenever a new artifact is generated or cleared.
//!
//! Overlapping `generate` calls are reconciled with a monotonic request
//! token: only the most recently issued call may apply its result, so a
//! slow early response can never overwrite a newer artifact.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use penna_core::{Artifact, FeedbackKind, FeedbackState, PennaError, StyleProfile};
use penna_session::SessionStore;
use tokio::sync::{watch, RwLock};
use tracing::debug;

use crate::projection::HistoryProjection;

/// Whether the current artifact is being viewed or edited. The scratch
/// buffer only exists while editing; leaving the mode discards it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Viewing,
    Editing {
        draft: String,
    },
}

impl EditMode {
    pub fn is_editing(&self) -> bool {
        matches!(self, EditMode::Editing { .. })
    }

    /// The scratch buffer, when editing.
    pub fn draft(&self) -> Option<&str> {
        match self {
            EditMode::Editing { draft } => Some(draft),
            EditMode::Viewing => None,
        }
    }
}

#[derive(Debug, Default)]
struct GenerationState {
    artifact: Option<Artifact>,
    edit: EditMode,
    notice: Option<String>,
    /// Token of the most recently issued generation; older resolutions are
    /// discarded.
    latest: u64,
}

/// Drives the prompt -> artifact -> feedback cycle.
pub struct GenerationController {
    session: Arc<SessionStore>,
    readiness: watch::Receiver<Option<StyleProfile>>,
    history: Arc<HistoryProjection>,
    state: RwLock<GenerationState>,
    seq: AtomicU64,
}

impl GenerationController {
    /// `readiness` is the sample gate's profile channel; generation is
    /// permitted only while it holds a profile.
    pub fn new(
        session: Arc<SessionStore>,
        readiness: watch::Receiver<Option<StyleProfile>>,
        history: Arc<HistoryProjection>,
    ) -> Self {
        Self {
            session,
            readiness,
            history,
            state: RwLock::new(GenerationState::default()),
            seq: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current artifact, if any.
    pub async fn artifact(&self) -> Option<Artifact> {
        self.state.read().await.artifact.clone()
    }

    pub async fn edit_mode(&self) -> EditMode {
        self.state.read().await.edit.clone()
    }

    /// Takes the pending informational message, if one is set.
    pub async fn take_notice(&self) -> Option<String> {
        self.state.write().await.notice.take()
    }

    /// Generates a new artifact. Rejected locally when the prompt is blank
    /// or no style profile is present — no remote call in either case.
    ///
    /// Returns `Ok(None)` when the call resolved but was no longer the most
    /// recent generation, in which case its result (success or failure) is
    /// discarded without touching state.
    pub async fn generate(
        &self,
        prompt: &str,
        context: &str,
    ) -> Result<Option<Artifact>, PennaError> {
        let prompt = prompt.trim().to_string();
        if prompt.is_empty() {
            return Err(PennaError::Validation(
                "Enter a prompt to generate content.".into(),
            ));
        }
        if self.readiness.borrow().is_none() {
            return Err(PennaError::NotReady(
                "No style profile yet. Upload writing samples and run analysis first.".into(),
            ));
        }

        let token = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        self.state.write().await.latest = token;

        let context = context.trim().to_string();
        let result = {
            let prompt = prompt.clone();
            let context = context.clone();
            self.session
                .request("Generation failed", move |api, credential| async move {
                    api.generate(&credential, &prompt, &context).await
                })
                .await
        };

        let mut state = self.state.write().await;
        if state.latest != token {
            debug!(token, latest = state.latest, "discarding stale generation result");
            return Ok(None);
        }
        let response = result?;

        let artifact = Artifact {
            id: response.content_id,
            prompt,
            context,
            content: response.generated_content,
            feedback: FeedbackState::Unrated,
            edited_content: None,
        };
        // The prior artifact, its feedback, and any edit in progress are
        // discarded here and are not recoverable.
        state.artifact = Some(artifact.clone());
        state.edit = EditMode::Viewing;
        state.notice = (!response.message.is_empty()).then_some(response.message);
        drop(state);

        self.history.refresh().await;
        Ok(Some(artifact))
    }

    /// Records feedback on the current artifact.
    ///
    /// Submitting the kind already recorded clears it back to `Unrated`
    /// locally and sets an informational notice — no remote call. Any other
    /// kind is submitted to the service; on success the new kind is adopted
    /// (and for `Modified`, the displayed content becomes the scratch
    /// buffer); on failure the state rolls back to `Unrated` while edit mode
    /// and the scratch buffer survive.
    pub async fn feedback(&self, kind: FeedbackKind) -> Result<FeedbackState, PennaError> {
        let (artifact_id, current, draft) = {
            let state = self.state.read().await;
            let Some(artifact) = state.artifact.as_ref() else {
                return Err(PennaError::Validation("No generated content to rate.".into()));
            };
            (
                artifact.id,
                artifact.feedback,
                state.edit.draft().map(str::to_string),
            )
        };

        // Toggle rule: same kind again undoes the rating locally.
        if current == FeedbackState::from(kind) {
            let mut state = self.state.write().await;
            if let Some(artifact) = state.artifact.as_mut().filter(|a| a.id == artifact_id) {
                artifact.feedback = FeedbackState::Unrated;
                state.notice = Some("Feedback removed.".into());
            }
            return Ok(FeedbackState::Unrated);
        }

        let modified = if kind == FeedbackKind::Modified {
            match draft {
                Some(draft) => Some(draft),
                None => {
                    return Err(PennaError::Validation(
                        "Start editing before submitting a modification.".into(),
                    ));
                }
            }
        } else {
            None
        };

        let result = {
            let modified = modified.clone();
            self.session
                .request(
                    "Failed to submit feedback",
                    move |api, credential| async move {
                        api.submit_feedback(&credential, artifact_id, kind, modified.as_deref())
                            .await
                    },
                )
                .await
        };

        match result {
            Ok(ack) => {
                {
                    let mut state = self.state.write().await;
                    if let Some(artifact) =
                        state.artifact.as_mut().filter(|a| a.id == artifact_id)
                    {
                        artifact.feedback = kind.into();
                        if kind == FeedbackKind::Modified {
                            artifact.edited_content = modified;
                            state.edit = EditMode::Viewing;
                        }
                        state.notice = (!ack.message.is_empty()).then_some(ack.message);
                    }
                }
                self.history.refresh().await;
                Ok(kind.into())
            }
            Err(e) => {
                // The attempted transition is void: back to Unrated, never
                // the pre-attempt value. The scratch buffer stays so the
                // user does not lose edits.
                let mut state = self.state.write().await;
                if let Some(artifact) = state.artifact.as_mut().filter(|a| a.id == artifact_id) {
                    artifact.feedback = FeedbackState::Unrated;
                }
                Err(e)
            }
        }
    }

    /// Copies the displayed content into the scratch buffer and enters
    /// `Editing`.
    pub async fn start_editing(&self) -> Result<(), PennaError> {
        let mut state = self.state.write().await;
        let Some(artifact) = state.artifact.as_ref() else {
            return Err(PennaError::Validation("No generated content to edit.".into()));
        };
        let draft = artifact.display_content().to_string();
        state.edit = EditMode::Editing { draft };
        Ok(())
    }

    /// Replaces the scratch buffer. Only valid while editing.
    pub async fn set_draft(&self, text: &str) -> Result<(), PennaError> {
        let mut state = self.state.write().await;
        match &mut state.edit {
            EditMode::Editing { draft } => {
                *draft = text.to_string();
                Ok(())
            }
            EditMode::Viewing => Err(PennaError::Validation(
                "Not editing. Start editing first.".into(),
            )),
        }
    }

    /// Discards the scratch buffer and returns to `Viewing`. No remote
    /// effect; harmless when not editing.
    pub async fn cancel_editing(&self) {
        self.state.write().await.edit = EditMode::Viewing;
    }

    /// Discards the current artifact, its feedback state, edit mode, and
    /// any pending notice. Idempotent, non-failing, independent of network
    /// state. Any in-flight generation is invalidated so a late result
    /// cannot resurrect the cleared artifact.
    pub async fn clear(&self) {
        let token = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        let mut state = self.state.write().await;
        state.artifact = None;
        state.edit = EditMode::Viewing;
        state.notice = None;
        state.latest = token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use penna_api::ApiClient;
    use penna_config::model::ServiceConfig;
    use penna_session::SessionCache;

    fn profile() -> StyleProfile {
        StyleProfile {
            owner_id: 1,
            vocabulary_level: "moderate".into(),
            formality_preference: "casual".into(),
            sentence_complexity: 14.2,
            sample_count: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Controller wired to an unreachable server: any remote call would
    /// surface a network error, so local rejections are provably local.
    /// The returned sender keeps the readiness channel alive.
    fn controller(
        dir: &std::path::Path,
        ready: Option<StyleProfile>,
    ) -> (GenerationController, watch::Sender<Option<StyleProfile>>) {
        let api = ApiClient::new(&ServiceConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 1,
        })
        .unwrap();
        let session = Arc::new(SessionStore::new(api, SessionCache::new(dir)));
        let (tx, rx) = watch::channel(ready);
        let history = Arc::new(HistoryProjection::new(session.clone(), 20));
        (GenerationController::new(session, rx, history), tx)
    }

    #[tokio::test]
    async fn blank_prompt_is_rejected_locally() {
        let dir = tempfile::tempdir().unwrap();
        let (ctrl, _tx) = controller(dir.path(), Some(profile()));
        let err = ctrl.generate("   ", "general").await.unwrap_err();
        assert!(matches!(err, PennaError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_profile_is_rejected_locally_with_distinct_error() {
        let dir = tempfile::tempdir().unwrap();
        let (ctrl, _tx) = controller(dir.path(), None);
        // A perfectly valid prompt still gates on readiness.
        let err = ctrl.generate("write a note", "general").await.unwrap_err();
        assert!(matches!(err, PennaError::NotReady(_)));
    }

    #[tokio::test]
    async fn feedback_without_artifact_is_rejected_locally() {
        let dir = tempfile::tempdir().unwrap();
        let (ctrl, _tx) = controller(dir.path(), Some(profile()));
        let err = ctrl.feedback(FeedbackKind::Accepted).await.unwrap_err();
        assert!(matches!(err, PennaError::Validation(_)));
    }

    #[tokio::test]
    async fn editing_requires_an_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let (ctrl, _tx) = controller(dir.path(), Some(profile()));
        assert!(ctrl.start_editing().await.is_err());
        assert!(ctrl.set_draft("text").await.is_err());
        // Cancelling without an artifact is harmless.
        ctrl.cancel_editing().await;
        assert_eq!(ctrl.edit_mode().await, EditMode::Viewing);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let (ctrl, _tx) = controller(dir.path(), Some(profile()));
        ctrl.clear().await;
        ctrl.clear().await;
        assert!(ctrl.artifact().await.is_none());
        assert_eq!(ctrl.edit_mode().await, EditMode::Viewing);
        assert!(ctrl.take_notice().await.is_none());
    }
}
