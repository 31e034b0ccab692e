// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire request/response types for the writing-assistant service.
//!
//! The service emits naive UTC timestamps (no offset suffix), so wire types
//! carry `NaiveDateTime` and the domain conversions pin them to UTC.

use chrono::NaiveDateTime;
use penna_core::{GenerationStats, HistoryEntry, StyleProfile, WritingSample};
use serde::{Deserialize, Serialize};

// --- Auth types ---

/// Credentials submitted to login and signup.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// The identity record returned alongside a credential.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityDto {
    pub id: i64,
    pub email: String,
    pub created_at: NaiveDateTime,
    pub is_active: bool,
}

/// Successful login/signup payload: credential plus identity.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: IdentityDto,
}

// --- Health ---

/// Health probe payload.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub version: String,
}

// --- Samples ---

/// Body for a sample upload.
#[derive(Debug, Clone, Serialize)]
pub struct SampleUploadRequest {
    pub title: String,
    pub content: String,
}

/// A writing sample as returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct SampleDto {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub uploaded_at: NaiveDateTime,
    pub analyzed: bool,
}

impl From<SampleDto> for WritingSample {
    fn from(dto: SampleDto) -> Self {
        WritingSample {
            id: dto.id,
            title: dto.title,
            content: dto.content,
            uploaded_at: dto.uploaded_at.and_utc(),
            analyzed: dto.analyzed,
        }
    }
}

/// The canonical style profile as returned by the profile endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileDto {
    pub user_id: i64,
    pub vocabulary_level: String,
    pub formality_preference: String,
    pub sentence_complexity: f64,
    #[serde(default)]
    pub sample_count: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ProfileDto> for StyleProfile {
    fn from(dto: ProfileDto) -> Self {
        StyleProfile {
            owner_id: dto.user_id,
            vocabulary_level: dto.vocabulary_level,
            formality_preference: dto.formality_preference,
            sentence_complexity: dto.sentence_complexity,
            sample_count: dto.sample_count,
            created_at: dto.created_at.and_utc(),
            updated_at: dto.updated_at.and_utc(),
        }
    }
}

/// Profile summary embedded in the analyze response.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeSummaryDto {
    pub vocabulary_level: String,
    pub formality_preference: String,
    pub avg_sentence_length: f64,
    pub sample_count: i64,
}

/// Payload of a successful analyze-all call.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub message: String,
    pub style_profile: AnalyzeSummaryDto,
}

// --- Generation ---

/// Body for a content generation call.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub context: String,
}

/// Payload of a successful generation call.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub generated_content: String,
    pub content_id: i64,
    #[serde(default)]
    pub message: String,
}

/// Body for a feedback submission.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRequest {
    pub content_id: i64,
    pub feedback_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_content: Option<String>,
}

/// Generic confirmation payload (`{message}`).
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: String,
}

// --- History / stats ---

/// One generation-history record as returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntryDto {
    pub id: i64,
    pub prompt: String,
    pub generated_text: String,
    pub user_feedback: Option<String>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub has_modifications: bool,
}

impl From<HistoryEntryDto> for HistoryEntry {
    fn from(dto: HistoryEntryDto) -> Self {
        HistoryEntry {
            id: dto.id,
            prompt: dto.prompt,
            generated_text: dto.generated_text,
            user_feedback: dto.user_feedback,
            created_at: dto.created_at.and_utc(),
            has_modifications: dto.has_modifications,
        }
    }
}

/// Envelope around the history list.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryEntryDto>,
}

/// Aggregate counters as returned by the stats endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsDto {
    pub total_generations: i64,
    pub accepted: i64,
    pub modified: i64,
    pub rejected: i64,
    pub acceptance_rate: f64,
    pub modification_rate: f64,
}

impl From<StatsDto> for GenerationStats {
    fn from(dto: StatsDto) -> Self {
        GenerationStats {
            total_generations: dto.total_generations,
            accepted: dto.accepted,
            modified: dto.modified,
            rejected: dto.rejected,
            acceptance_rate: dto.acceptance_rate,
            modification_rate: dto.modification_rate,
        }
    }
}

/// Envelope around the stats payload.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    pub stats: StatsDto,
}

/// Error body shape used by the service (`{"detail": "..."}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub detail: String,
}
