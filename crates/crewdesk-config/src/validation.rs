// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses and non-zero timeouts.

use crate::diagnostic::ConfigError;
use crate::model::CrewdeskConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &CrewdeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level `{}` is not one of trace, debug, info, warn, error",
                config.agent.log_level
            ),
        });
    }

    if config.azure.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "azure.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if let Some(endpoint) = config.azure.endpoint.as_deref() {
        if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
            errors.push(ConfigError::Validation {
                message: format!("azure.endpoint `{endpoint}` must be an http(s) URL"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Verify the Azure section carries everything the completion provider needs.
///
/// The serve path calls this before constructing the provider so a missing
/// credential fails fast at startup with a pointed message, instead of on the
/// first completion call. `api_key` may still come from the
/// `AZURE_OPENAI_API_KEY` environment variable.
pub fn require_azure(config: &CrewdeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.azure.api_key.is_none() && std::env::var("AZURE_OPENAI_API_KEY").is_err() {
        errors.push(ConfigError::MissingKey {
            key: "azure.api_key".to_string(),
        });
    }
    if config.azure.endpoint.is_none() {
        errors.push(ConfigError::MissingKey {
            key: "azure.endpoint".to_string(),
        });
    }
    if config.azure.deployment.is_none() {
        errors.push(ConfigError::MissingKey {
            key: "azure.deployment".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AzureConfig;

    #[test]
    fn default_config_passes_validation() {
        let config = CrewdeskConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_host_and_bad_log_level_are_both_reported() {
        let mut config = CrewdeskConfig::default();
        config.server.host = " ".into();
        config.agent.log_level = "verbose".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = CrewdeskConfig::default();
        config.azure.request_timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn non_http_endpoint_is_rejected() {
        let mut config = CrewdeskConfig::default();
        config.azure.endpoint = Some("ftp://example.com".into());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn require_azure_reports_every_missing_key() {
        let config = CrewdeskConfig {
            azure: AzureConfig {
                api_key: Some("key".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let errors = require_azure(&config).unwrap_err();
        let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert!(rendered.iter().any(|e| e.contains("azure.endpoint")));
        assert!(rendered.iter().any(|e| e.contains("azure.deployment")));
    }

    #[test]
    fn require_azure_passes_with_full_section() {
        let config = CrewdeskConfig {
            azure: AzureConfig {
                api_key: Some("key".into()),
                endpoint: Some("https://support.openai.azure.com".into()),
                deployment: Some("gpt-4o".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(require_azure(&config).is_ok());
    }
}
