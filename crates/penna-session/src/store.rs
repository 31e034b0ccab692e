// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The session store: owns authentication state and its durable cache.
//!
//! State machine: `Unauthenticated -> (login/signup success) ->
//! Authenticated -> (logout | server-detected credential rejection) ->
//! Unauthenticated`. A call in flight never mutates state; credential and
//! identity are installed or cleared together, never one without the other.
//!
//! Every authenticated call in the client goes through [`SessionStore::request`],
//! which attaches the current credential and funnels a 401 through the
//! forced-logout path before the caller sees any error.

use std::future::Future;

use chrono::Utc;
use penna_api::{ApiClient, ApiError};
use penna_core::{PennaError, Session};
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use crate::cache::{CachedIdentity, SessionCache};

/// Owns the active [`Session`], the durable cache, and the
/// authenticated-request capability.
pub struct SessionStore {
    api: ApiClient,
    cache: SessionCache,
    current: RwLock<Option<Session>>,
    auth_tx: watch::Sender<bool>,
}

impl SessionStore {
    pub fn new(api: ApiClient, cache: SessionCache) -> Self {
        let (auth_tx, _) = watch::channel(false);
        Self {
            api,
            cache,
            current: RwLock::new(None),
            auth_tx,
        }
    }

    /// Restores a session from the durable cache, if one is present and
    /// well formed. Never fails: a missing, partial, or corrupt cache
    /// degrades to the unauthenticated state (and is purged by the cache
    /// layer). Restoring again with the same cached credential is a no-op.
    pub async fn restore(&self) {
        let Some((credential, identity)) = self.cache.load() else {
            debug!("no cached session to restore");
            return;
        };

        {
            let current = self.current.read().await;
            if current.as_ref().map(|s| s.credential.as_str()) == Some(credential.as_str()) {
                return;
            }
        }

        let session = Session {
            user_id: identity.id,
            email: identity.email,
            credential,
            established_at: Utc::now(),
        };
        info!(email = %session.email, "session restored from cache");
        *self.current.write().await = Some(session);
        self.auth_tx.send_replace(true);
    }

    /// Logs in with email + password. On success the returned credential and
    /// identity are installed atomically and persisted; on failure prior
    /// state (if any) is left untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, PennaError> {
        let response = self
            .api
            .login(email, password)
            .await
            .map_err(|e| surface(e, "Login failed. Please check your credentials."))?;
        Ok(self.install(response).await)
    }

    /// Creates an account and installs the returned session, as [`login`].
    ///
    /// [`login`]: SessionStore::login
    pub async fn signup(&self, email: &str, password: &str) -> Result<Session, PennaError> {
        let response = self
            .api
            .signup(email, password)
            .await
            .map_err(|e| surface(e, "Signup failed. Please try again."))?;
        Ok(self.install(response).await)
    }

    /// Clears the in-memory session, purges the durable cache, and disarms
    /// the authenticated-request capability — unconditionally, even if no
    /// session was active. The remote logout call is best-effort.
    pub async fn logout(&self) {
        let credential = {
            self.current
                .read()
                .await
                .as_ref()
                .map(|s| s.credential.clone())
        };
        if let Some(credential) = credential {
            if let Err(e) = self.api.logout(&credential).await {
                debug!(error = %e, "remote logout failed, continuing with local logout");
            }
        }
        self.force_logout().await;
    }

    /// Snapshot of the active session, if any.
    pub async fn session(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Subscribes to authentication-state changes. Receivers observe `false`
    /// the moment a forced logout lands, before the triggering caller has
    /// surfaced its error.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.auth_tx.subscribe()
    }

    /// The authenticated-request wrapper. Resolves the current credential,
    /// runs `op` with it, and funnels the outcome:
    ///
    /// - a 401 forces a logout first and surfaces [`PennaError::SessionExpired`];
    /// - a transport failure surfaces the generic connectivity message;
    /// - a service failure surfaces the server's `detail` text when present,
    ///   else the caller's `fallback` message.
    ///
    /// No component issues an authenticated call except through here.
    pub async fn request<T, F, Fut>(&self, fallback: &str, op: F) -> Result<T, PennaError>
    where
        F: FnOnce(ApiClient, String) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let credential = {
            self.current
                .read()
                .await
                .as_ref()
                .map(|s| s.credential.clone())
        }
        .ok_or(PennaError::NotAuthenticated)?;

        match op(self.api.clone(), credential).await {
            Ok(value) => Ok(value),
            Err(ApiError::Unauthorized { detail }) => {
                warn!(detail = ?detail, "credential rejected by the service, forcing logout");
                self.force_logout().await;
                Err(PennaError::SessionExpired)
            }
            Err(ApiError::Transport { source }) => Err(PennaError::Network {
                source: Some(Box::new(source)),
            }),
            Err(ApiError::Service { detail, .. }) => Err(PennaError::Service {
                message: detail.unwrap_or_else(|| fallback.to_string()),
            }),
            Err(ApiError::Decode(message)) => Err(PennaError::Internal(message)),
        }
    }

    /// Installs a freshly authenticated session: persists the cache pair,
    /// swaps the in-memory state, and notifies subscribers.
    async fn install(&self, response: penna_api::types::TokenResponse) -> Session {
        let identity = CachedIdentity {
            id: response.user.id,
            email: response.user.email.clone(),
            created_at: response.user.created_at.and_utc(),
            is_active: response.user.is_active,
        };
        let session = Session {
            user_id: identity.id,
            email: identity.email.clone(),
            credential: response.access_token,
            established_at: Utc::now(),
        };

        if let Err(e) = self.cache.store(&session.credential, &identity) {
            // The session is still valid for this process; only restoration
            // after restart is lost.
            warn!(error = %e, "failed to persist session cache");
        }

        info!(email = %session.email, "session established");
        *self.current.write().await = Some(session.clone());
        self.auth_tx.send_replace(true);
        session
    }

    /// Clears memory and cache together and notifies subscribers. Local
    /// only — no remote call.
    async fn force_logout(&self) {
        *self.current.write().await = None;
        self.cache.purge();
        self.auth_tx.send_replace(false);
    }
}

/// Maps an unauthenticated-call failure (login/signup) onto a user-facing
/// error. A 401 here means bad credentials, not an expired session, so it
/// surfaces like any other service failure.
fn surface(err: ApiError, fallback: &str) -> PennaError {
    match err {
        ApiError::Unauthorized { detail } | ApiError::Service { detail, .. } => {
            PennaError::Service {
                message: detail.unwrap_or_else(|| fallback.to_string()),
            }
        }
        ApiError::Transport { source } => PennaError::Network {
            source: Some(Box::new(source)),
        },
        ApiError::Decode(message) => PennaError::Internal(message),
    }
}
