// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Penna client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Penna configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PennaConfig {
    /// Remote writing-assistant service settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Durable session cache settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Content generation settings.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Interactive shell settings.
    #[serde(default)]
    pub shell: ShellConfig,
}

/// Remote service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Base URL of the writing-assistant API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Durable session cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Directory holding the cached credential and identity record.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("penna"))
        .unwrap_or_else(|| std::path::PathBuf::from(".penna"))
        .to_string_lossy()
        .to_string()
}

/// Content generation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Context hint sent with each generation request.
    #[serde(default = "default_context")]
    pub default_context: String,

    /// Number of history entries fetched into the projection.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_context: default_context(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_context() -> String {
    "general".to_string()
}

fn default_history_limit() -> u32 {
    20
}

/// Interactive shell configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to colorize shell output.
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            color: default_color(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_color() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = PennaConfig::default();
        assert_eq!(config.service.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.service.timeout_secs, 30);
        assert_eq!(config.generation.default_context, "general");
        assert_eq!(config.generation.history_limit, 20);
        assert_eq!(config.shell.log_level, "info");
        assert!(!config.session.cache_dir.is_empty());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let toml_str = r#"
[service]
base_url = "https://penna.example.com"
"#;
        let config: PennaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.service.base_url, "https://penna.example.com");
        assert_eq!(config.service.timeout_secs, 30);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml_str = r#"
[service]
base_uri = "https://penna.example.com"
"#;
        assert!(toml::from_str::<PennaConfig>(toml_str).is_err());
    }
}
