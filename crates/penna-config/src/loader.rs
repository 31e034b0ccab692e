// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./penna.toml` > `~/.config/penna/penna.toml` >
//! `/etc/penna/penna.toml` with environment variable overrides via the
//! `PENNA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PennaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/penna/penna.toml` (system-wide)
/// 3. `~/.config/penna/penna.toml` (user XDG config)
/// 4. `./penna.toml` (local directory)
/// 5. `PENNA_*` environment variables
pub fn load_config() -> Result<PennaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PennaConfig::default()))
        .merge(Toml::file("/etc/penna/penna.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("penna/penna.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("penna.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<PennaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PennaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PennaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PennaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that key names which
/// themselves contain underscores stay intact: `PENNA_SERVICE_BASE_URL`
/// must map to `service.base_url`, not `service.base.url`.
fn env_provider() -> Env {
    Env::prefixed("PENNA_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: PENNA_SERVICE_BASE_URL -> "service_base_url"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("session_", "session.", 1)
            .replacen("generation_", "generation.", 1)
            .replacen("shell_", "shell.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_str_applies_overrides() {
        let config = load_config_from_str(
            r#"
[service]
base_url = "https://writing.example.com"
timeout_secs = 5

[generation]
history_limit = 50
"#,
        )
        .unwrap();
        assert_eq!(config.service.base_url, "https://writing.example.com");
        assert_eq!(config.service.timeout_secs, 5);
        assert_eq!(config.generation.history_limit, 50);
        // Untouched sections keep their defaults.
        assert_eq!(config.generation.default_context, "general");
    }

    #[test]
    fn env_var_overrides_toml() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PENNA_SERVICE_BASE_URL", "https://env.example.com");
            let config: PennaConfig = Figment::new()
                .merge(Serialized::defaults(PennaConfig::default()))
                .merge(Toml::string("[service]\nbase_url = \"https://file.example.com\""))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.service.base_url, "https://env.example.com");
            Ok(())
        });
    }
}
