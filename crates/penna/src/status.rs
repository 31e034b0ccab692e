// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `penna status` command implementation.
//!
//! Probes the service health endpoint and reports whether a cached session
//! is present, without touching it.

use colored::Colorize;
use penna_api::{ApiClient, ApiError};
use penna_config::PennaConfig;
use penna_core::PennaError;
use penna_session::SessionCache;

/// Runs the `penna status` probe.
pub async fn run_status(config: PennaConfig) -> Result<(), PennaError> {
    let api = ApiClient::new(&config.service)
        .map_err(|e| PennaError::Internal(format!("failed to build HTTP client: {e}")))?;

    println!("{} {}", "service:".bold(), config.service.base_url);
    match api.health().await {
        Ok(health) => {
            println!("{} {}", "status:".bold(), health.status.green());
            if !health.version.is_empty() {
                println!("{} {}", "version:".bold(), health.version);
            }
        }
        Err(e) => {
            println!("{} {}", "status:".bold(), "unreachable".red());
            return Err(match e {
                ApiError::Transport { source } => PennaError::Network {
                    source: Some(Box::new(source)),
                },
                other => PennaError::Service {
                    message: other.to_string(),
                },
            });
        }
    }

    match SessionCache::new(&config.session.cache_dir).load() {
        Some((_, identity)) => {
            println!("{} {}", "cached session:".bold(), identity.email);
        }
        None => {
            println!("{} none", "cached session:".bold());
        }
    }

    Ok(())
}
