// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only projection of generation history and aggregate statistics.
//!
//! This path is advisory, not authoritative: it is re-fetched after every
//! state-changing success elsewhere, and any failure degrades silently to
//! an empty/absent projection. Nothing here surfaces a user-facing error —
//! though an authorization failure still passes through the session store's
//! wrapper, so a forced logout fires before the failure is swallowed.

use std::sync::Arc;

use penna_core::{GenerationStats, HistoryEntry};
use penna_session::SessionStore;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct ProjectionState {
    entries: Vec<HistoryEntry>,
    stats: Option<GenerationStats>,
}

/// Rebuildable view over the service's history and stats endpoints.
pub struct HistoryProjection {
    session: Arc<SessionStore>,
    limit: u32,
    state: RwLock<ProjectionState>,
}

impl HistoryProjection {
    /// `limit` bounds how many recent history entries each refresh fetches.
    pub fn new(session: Arc<SessionStore>, limit: u32) -> Self {
        Self {
            session,
            limit,
            state: RwLock::new(ProjectionState::default()),
        }
    }

    /// The most recently fetched history entries, newest first.
    pub async fn entries(&self) -> Vec<HistoryEntry> {
        self.state.read().await.entries.clone()
    }

    /// The most recently fetched aggregate counters, if any.
    pub async fn stats(&self) -> Option<GenerationStats> {
        self.state.read().await.stats.clone()
    }

    /// Re-fetches both views. Never fails; a failed fetch projects empty.
    pub async fn refresh(&self) {
        let limit = self.limit;
        let entries = match self
            .session
            .request("History refresh failed", move |api, credential| async move {
                api.history(&credential, limit).await
            })
            .await
        {
            Ok(dtos) => dtos.into_iter().map(HistoryEntry::from).collect(),
            Err(e) => {
                debug!(error = %e, "history refresh failed, projecting empty");
                Vec::new()
            }
        };

        let stats = match self
            .session
            .request("Stats refresh failed", |api, credential| async move {
                api.stats(&credential).await
            })
            .await
        {
            Ok(dto) => Some(GenerationStats::from(dto)),
            Err(e) => {
                debug!(error = %e, "stats refresh failed, projecting absent");
                None
            }
        };

        let mut state = self.state.write().await;
        state.entries = entries;
        state.stats = stats;
    }

    /// Empties the projection; used when the session ends.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        state.entries.clear();
        state.stats = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use penna_api::ApiClient;
    use penna_config::model::ServiceConfig;
    use penna_session::SessionCache;

    fn unreachable_store(dir: &std::path::Path) -> Arc<SessionStore> {
        let api = ApiClient::new(&ServiceConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 1,
        })
        .unwrap();
        Arc::new(SessionStore::new(api, SessionCache::new(dir)))
    }

    #[tokio::test]
    async fn starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let projection = HistoryProjection::new(unreachable_store(dir.path()), 20);
        assert!(projection.entries().await.is_empty());
        assert!(projection.stats().await.is_none());
    }

    #[tokio::test]
    async fn refresh_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let projection = HistoryProjection::new(unreachable_store(dir.path()), 20);
        // No session and no server; both fetches fail and degrade silently.
        projection.refresh().await;
        assert!(projection.entries().await.is_empty());
        assert!(projection.stats().await.is_none());
    }
}
