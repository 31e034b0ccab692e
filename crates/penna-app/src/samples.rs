// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The sample readiness gate: owns the writing-sample set and the derived
//! style profile whose presence gates content generation.
//!
//! The profile is published on a watch channel so dependents (the
//! generation controller, the shell) observe readiness changes without
//! holding a reference to the gate itself.

use std::sync::Arc;

use penna_core::{PennaError, StyleProfile, WritingSample};
use penna_session::SessionStore;
use tokio::sync::{watch, RwLock};
use tracing::debug;

use crate::projection::HistoryProjection;

/// Minimum sample length accepted for upload, in characters.
pub const MIN_SAMPLE_CHARS: usize = 50;

/// Owns the sample set and the readiness signal for generation.
pub struct SampleGate {
    session: Arc<SessionStore>,
    history: Arc<HistoryProjection>,
    samples: RwLock<Vec<WritingSample>>,
    profile_tx: watch::Sender<Option<StyleProfile>>,
}

impl SampleGate {
    pub fn new(session: Arc<SessionStore>, history: Arc<HistoryProjection>) -> Self {
        let (profile_tx, _) = watch::channel(None);
        Self {
            session,
            history,
            samples: RwLock::new(Vec::new()),
            profile_tx,
        }
    }

    /// Snapshot of the cached sample set.
    pub async fn samples(&self) -> Vec<WritingSample> {
        self.samples.read().await.clone()
    }

    /// The current style profile, if one has been built.
    pub fn profile(&self) -> Option<StyleProfile> {
        self.profile_tx.borrow().clone()
    }

    /// Subscribes to readiness changes. The receiver's current value is
    /// always the latest profile (or `None` when absent).
    pub fn subscribe(&self) -> watch::Receiver<Option<StyleProfile>> {
        self.profile_tx.subscribe()
    }

    /// Uploads a writing sample. Blank or too-short input is rejected
    /// locally; no remote call is made in that case.
    pub async fn upload(&self, title: &str, content: &str) -> Result<WritingSample, PennaError> {
        if title.trim().is_empty() || content.trim().is_empty() {
            return Err(PennaError::Validation(
                "Title and content are required.".into(),
            ));
        }
        if content.trim().chars().count() < MIN_SAMPLE_CHARS {
            return Err(PennaError::Validation(format!(
                "Writing samples must be at least {MIN_SAMPLE_CHARS} characters long."
            )));
        }

        let dto = {
            let title = title.to_string();
            let content = content.to_string();
            self.session
                .request(
                    "Upload failed. Please try again.",
                    move |api, credential| async move {
                        api.upload_sample(&credential, &title, &content).await
                    },
                )
                .await?
        };
        let sample = WritingSample::from(dto);
        self.refresh_samples().await?;
        self.history.refresh().await;
        Ok(sample)
    }

    /// Runs style analysis over the full current sample set and replaces the
    /// style profile wholesale. Rejected locally when no samples are cached.
    pub async fn analyze(&self) -> Result<StyleProfile, PennaError> {
        if self.samples.read().await.is_empty() {
            return Err(PennaError::Validation(
                "Upload at least one writing sample before analyzing.".into(),
            ));
        }

        let ack = self
            .session
            .request("Analysis failed", |api, credential| async move {
                api.analyze_samples(&credential).await
            })
            .await?;
        debug!(message = %ack.message, "analysis completed");

        // Re-fetch samples for the updated `analyzed` flags, then the
        // canonical profile; publishing it notifies dependents.
        self.refresh_samples().await?;
        let profile = self.refresh_profile().await?;
        self.history.refresh().await;
        profile.ok_or_else(|| {
            PennaError::Internal("analysis succeeded but no style profile was returned".into())
        })
    }

    /// Deletes a sample and re-fetches the list. An already-built profile is
    /// left standing until the next explicit analyze, even if the removed
    /// sample contributed to it.
    pub async fn remove(&self, sample_id: i64) -> Result<(), PennaError> {
        self.session
            .request("Failed to delete sample", move |api, credential| async move {
                api.delete_sample(&credential, sample_id).await
            })
            .await?;
        self.refresh_samples().await?;
        self.history.refresh().await;
        Ok(())
    }

    /// Re-fetches samples and profile; used after login or restore.
    pub async fn refresh(&self) -> Result<(), PennaError> {
        self.refresh_samples().await?;
        self.refresh_profile().await?;
        Ok(())
    }

    /// Drops all cached state and publishes profile absence; used on logout.
    pub async fn reset(&self) {
        self.samples.write().await.clear();
        self.profile_tx.send_replace(None);
    }

    async fn refresh_samples(&self) -> Result<(), PennaError> {
        let dtos = self
            .session
            .request(
                "Could not load writing samples",
                |api, credential| async move { api.list_samples(&credential).await },
            )
            .await?;
        *self.samples.write().await = dtos.into_iter().map(WritingSample::from).collect();
        Ok(())
    }

    async fn refresh_profile(&self) -> Result<Option<StyleProfile>, PennaError> {
        let dto = self
            .session
            .request(
                "Could not load style profile",
                |api, credential| async move { api.style_profile(&credential).await },
            )
            .await?;
        let profile = dto.map(StyleProfile::from);
        self.profile_tx.send_replace(profile.clone());
        Ok(profile)
    }
}
