// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Crewdesk support service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so mistyped config keys
//! fail at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level Crewdesk configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections default to sensible values; the Azure
/// credentials are the only fields that must be provided before serving.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CrewdeskConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// HTTP/WebSocket server binding.
    #[serde(default)]
    pub server: ServerConfig,

    /// Azure OpenAI completion endpoint settings.
    #[serde(default)]
    pub azure: AzureConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in the welcome message and logs.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

/// HTTP/WebSocket server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Azure OpenAI endpoint configuration.
///
/// `api_key` may be left unset in the file and provided through the
/// `AZURE_OPENAI_API_KEY` environment variable instead; resolution happens
/// when the completion provider is constructed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AzureConfig {
    /// API key for the Azure OpenAI resource.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Deployment identifier of the chat model.
    #[serde(default)]
    pub deployment: Option<String>,

    /// API version query parameter.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Bound placed on every completion call, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: None,
            deployment: None,
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_agent_name() -> String {
    "crewdesk".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_api_version() -> String {
    "2024-02-15-preview".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = CrewdeskConfig::default();
        assert_eq!(config.agent.name, "crewdesk");
        assert_eq!(config.agent.log_level, "info");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3001);
        assert!(config.azure.api_key.is_none());
        assert_eq!(config.azure.api_version, "2024-02-15-preview");
        assert_eq!(config.azure.request_timeout_secs, 30);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<CrewdeskConfig, _> =
            toml::from_str("[server]\nhost = \"0.0.0.0\"\nprot = 8080\n");
        assert!(result.is_err());
    }
}
