// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the writing-assistant service.
//!
//! Provides [`ApiClient`] which handles request construction, bearer
//! authentication, and status-driven error mapping. This client is
//! deliberately stateless: credentials are passed per call by the session
//! store's authenticated-request wrapper, never stored here.

use std::time::Duration;

use penna_core::FeedbackKind;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;
use crate::types::{
    Ack, AnalyzeResponse, ApiErrorBody, CredentialsRequest, FeedbackRequest, GenerateRequest,
    GenerateResponse, HealthResponse, HistoryEntryDto, HistoryResponse, ProfileDto, SampleDto,
    SampleUploadRequest, StatsDto, StatsResponse, TokenResponse,
};

/// HTTP client for the writing-assistant service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a new service client from the `[service]` config section.
    pub fn new(config: &penna_config::model::ServiceConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Transport { source: e })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Probes the unauthenticated health endpoint.
    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.send(self.client.get(self.url("/health"))).await
    }

    /// Exchanges email + password for a credential and identity record.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let body = CredentialsRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send(self.client.post(self.url("/api/auth/login")).json(&body))
            .await
    }

    /// Registers a new account and returns its credential and identity.
    pub async fn signup(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let body = CredentialsRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send(self.client.post(self.url("/api/auth/signup")).json(&body))
            .await
    }

    /// Notifies the service of a logout. Callers treat failures as advisory.
    pub async fn logout(&self, credential: &str) -> Result<Ack, ApiError> {
        self.send(
            self.client
                .post(self.url("/api/auth/logout"))
                .bearer_auth(credential),
        )
        .await
    }

    /// Fetches the style profile; a 404 means none has been built yet.
    pub async fn style_profile(&self, credential: &str) -> Result<Option<ProfileDto>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/samples/profile"))
            .bearer_auth(credential)
            .send()
            .await
            .map_err(|e| ApiError::Transport { source: e })?;

        let status = response.status();
        debug!(status = %status, "profile response received");
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport { source: e })?;
        if status.is_success() {
            let dto: ProfileDto = serde_json::from_str(&body)
                .map_err(|e| ApiError::Decode(format!("profile payload: {e}")))?;
            Ok(Some(dto))
        } else {
            Err(error_for(status, &body))
        }
    }

    /// Uploads a writing sample.
    pub async fn upload_sample(
        &self,
        credential: &str,
        title: &str,
        content: &str,
    ) -> Result<SampleDto, ApiError> {
        let body = SampleUploadRequest {
            title: title.to_string(),
            content: content.to_string(),
        };
        self.send(
            self.client
                .post(self.url("/api/samples/upload"))
                .bearer_auth(credential)
                .json(&body),
        )
        .await
    }

    /// Lists the caller's writing samples.
    pub async fn list_samples(&self, credential: &str) -> Result<Vec<SampleDto>, ApiError> {
        self.send(
            self.client
                .get(self.url("/api/samples/user"))
                .bearer_auth(credential),
        )
        .await
    }

    /// Runs style analysis over the full current sample set.
    pub async fn analyze_samples(&self, credential: &str) -> Result<AnalyzeResponse, ApiError> {
        self.send(
            self.client
                .post(self.url("/api/samples/analyze"))
                .bearer_auth(credential),
        )
        .await
    }

    /// Deletes a writing sample by id.
    pub async fn delete_sample(&self, credential: &str, sample_id: i64) -> Result<Ack, ApiError> {
        self.send(
            self.client
                .delete(self.url(&format!("/api/samples/sample/{sample_id}")))
                .bearer_auth(credential),
        )
        .await
    }

    /// Requests content generation for a prompt and context hint.
    pub async fn generate(
        &self,
        credential: &str,
        prompt: &str,
        context: &str,
    ) -> Result<GenerateResponse, ApiError> {
        let body = GenerateRequest {
            prompt: prompt.to_string(),
            context: context.to_string(),
        };
        self.send(
            self.client
                .post(self.url("/api/generate/content"))
                .bearer_auth(credential)
                .json(&body),
        )
        .await
    }

    /// Submits feedback for a generated artifact. `modified_content` is sent
    /// only for [`FeedbackKind::Modified`].
    pub async fn submit_feedback(
        &self,
        credential: &str,
        content_id: i64,
        kind: FeedbackKind,
        modified_content: Option<&str>,
    ) -> Result<Ack, ApiError> {
        let body = FeedbackRequest {
            content_id,
            feedback_type: kind.to_string(),
            modified_content: modified_content.map(str::to_string),
        };
        self.send(
            self.client
                .post(self.url("/api/generate/feedback"))
                .bearer_auth(credential)
                .json(&body),
        )
        .await
    }

    /// Fetches the most recent `limit` generation-history entries.
    pub async fn history(
        &self,
        credential: &str,
        limit: u32,
    ) -> Result<Vec<HistoryEntryDto>, ApiError> {
        let envelope: HistoryResponse = self
            .send(
                self.client
                    .get(self.url("/api/generate/history"))
                    .query(&[("limit", limit)])
                    .bearer_auth(credential),
            )
            .await?;
        Ok(envelope.history)
    }

    /// Fetches the aggregate generation statistics.
    pub async fn stats(&self, credential: &str) -> Result<StatsDto, ApiError> {
        let envelope: StatsResponse = self
            .send(
                self.client
                    .get(self.url("/api/generate/stats"))
                    .bearer_auth(credential),
            )
            .await?;
        Ok(envelope.stats)
    }

    /// Sends a request and decodes the response, mapping failure statuses
    /// onto [`ApiError`] variants.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport { source: e })?;

        let status = response.status();
        debug!(status = %status, "service response received");

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport { source: e })?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(format!("{e}")))
        } else {
            Err(error_for(status, &body))
        }
    }
}

/// Maps a failure status and body onto the matching [`ApiError`] variant,
/// extracting the service's `detail` text when the body carries one.
fn error_for(status: StatusCode, body: &str) -> ApiError {
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.detail);
    if status == StatusCode::UNAUTHORIZED {
        ApiError::Unauthorized { detail }
    } else {
        ApiError::Service {
            status: status.as_u16(),
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use penna_config::model::ServiceConfig;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> ApiClient {
        ApiClient::new(&ServiceConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn token_body() -> serde_json::Value {
        serde_json::json!({
            "access_token": "tok-123",
            "token_type": "bearer",
            "user": {
                "id": 1,
                "email": "me@example.com",
                "created_at": "2026-03-01T09:30:00",
                "is_active": true
            }
        })
    }

    #[tokio::test]
    async fn login_success_returns_credential_and_identity() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(serde_json::json!({
                "email": "me@example.com",
                "password": "hunter22"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let resp = client.login("me@example.com", "hunter22").await.unwrap();
        assert_eq!(resp.access_token, "tok-123");
        assert_eq!(resp.user.email, "me@example.com");
    }

    #[tokio::test]
    async fn login_failure_surfaces_service_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "detail": "Incorrect email or password"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.login("me@example.com", "wrong").await.unwrap_err();
        match err {
            ApiError::Unauthorized { detail } => {
                assert_eq!(detail.as_deref(), Some("Incorrect email or password"));
            }
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn signup_conflict_maps_to_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signup"))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "detail": "Email already registered"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.signup("me@example.com", "hunter22").await.unwrap_err();
        match err {
            ApiError::Service { status, detail } => {
                assert_eq!(status, 409);
                assert_eq!(detail.as_deref(), Some("Email already registered"));
            }
            other => panic!("expected Service, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn authenticated_calls_carry_bearer_credential() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/samples/user"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let samples = client.list_samples("tok-123").await.unwrap();
        assert!(samples.is_empty());
    }

    #[tokio::test]
    async fn profile_not_found_maps_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/samples/profile"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "detail": "Style profile not found. Please upload writing samples first."
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let profile = client.style_profile("tok-123").await.unwrap();
        assert!(profile.is_none());
    }

    #[tokio::test]
    async fn expired_credential_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/samples/profile"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "detail": "Token expired"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.style_profile("tok-stale").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn generate_returns_artifact_id_and_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate/content"))
            .and(body_json(serde_json::json!({
                "prompt": "write a note",
                "context": "general"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "generated_content": "Dear reader, ...",
                "content_id": 42,
                "message": "Content generated successfully in your personal style"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let resp = client
            .generate("tok-123", "write a note", "general")
            .await
            .unwrap();
        assert_eq!(resp.content_id, 42);
        assert_eq!(resp.generated_content, "Dear reader, ...");
    }

    #[tokio::test]
    async fn feedback_body_includes_modified_content_only_when_present() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate/feedback"))
            .and(body_json(serde_json::json!({
                "content_id": 42,
                "feedback_type": "modified",
                "modified_content": "my version"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "message": "Feedback submitted successfully."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client
            .submit_feedback("tok-123", 42, FeedbackKind::Modified, Some("my version"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn history_unwraps_envelope_and_passes_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/generate/history"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "history": [{
                    "id": 7,
                    "prompt": "a note",
                    "generated_text": "text",
                    "user_feedback": "accepted",
                    "created_at": "2026-03-01T09:30:00",
                    "has_modifications": false
                }]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let entries = client.history("tok-123", 5).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, 7);
        assert_eq!(entries[0].user_feedback.as_deref(), Some("accepted"));
    }

    #[tokio::test]
    async fn stats_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/generate/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "stats": {
                    "total_generations": 10,
                    "accepted": 6,
                    "modified": 2,
                    "rejected": 2,
                    "acceptance_rate": 60.0,
                    "modification_rate": 20.0
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let stats = client.stats("tok-123").await.unwrap();
        assert_eq!(stats.total_generations, 10);
        assert_eq!(stats.acceptance_rate, 60.0);
    }

    #[tokio::test]
    async fn unreachable_server_maps_to_transport_error() {
        // Port 1 is never listening.
        let client = test_client("http://127.0.0.1:1");
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
    }

    #[tokio::test]
    async fn malformed_success_body_maps_to_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/generate/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.stats("tok-123").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
