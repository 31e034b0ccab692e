// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as well-formed base URLs and positive limits.

use crate::diagnostic::ConfigError;
use crate::model::PennaConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PennaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let base_url = config.service.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "service.base_url must not be empty".to_string(),
        });
    } else if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!("service.base_url `{base_url}` must start with http:// or https://"),
        });
    }

    if config.service.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "service.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.session.cache_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "session.cache_dir must not be empty".to_string(),
        });
    }

    if config.generation.history_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "generation.history_limit must be at least 1".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.shell.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "shell.log_level `{}` must be one of: {}",
                config.shell.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
