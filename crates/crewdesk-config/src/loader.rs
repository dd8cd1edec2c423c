// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./crewdesk.toml` > `~/.config/crewdesk/crewdesk.toml`
//! > `/etc/crewdesk/crewdesk.toml`, with environment variable overrides via
//! the `CREWDESK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::CrewdeskConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/crewdesk/crewdesk.toml` (system-wide)
/// 3. `~/.config/crewdesk/crewdesk.toml` (user XDG config)
/// 4. `./crewdesk.toml` (local directory)
/// 5. `CREWDESK_*` environment variables
pub fn load_config() -> Result<CrewdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CrewdeskConfig::default()))
        .merge(Toml::file("/etc/crewdesk/crewdesk.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("crewdesk/crewdesk.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("crewdesk.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<CrewdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CrewdeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CrewdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CrewdeskConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so underscore-containing
/// key names stay unambiguous: `CREWDESK_AZURE_API_KEY` must map to
/// `azure.api_key`, not `azure.api.key`.
fn env_provider() -> Env {
    Env::prefixed("CREWDESK_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("server_", "server.", 1)
            .replacen("azure_", "azure.", 1);
        mapped.into()
    })
}
