// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge.
//!
//! Converts Figment deserialization errors into miette diagnostics so config
//! mistakes render as readable, actionable messages at startup.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error with diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(crewdesk::config::missing_key),
        help("add `{key} = <value>` to your crewdesk.toml or set the matching CREWDESK_ environment variable")
    )]
    MissingKey {
        /// The missing key name, in `section.key` form.
        key: String,
    },

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(crewdesk::config::validation))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// Catch-all for parse and type errors reported by Figment.
    #[error("configuration error: {0}")]
    #[diagnostic(code(crewdesk::config::other))]
    Other(String),
}

/// Convert a Figment extraction error into one [`ConfigError`] per failure.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    use figment::error::Kind;

    let mut errors = Vec::new();
    for error in err {
        let config_error = match &error.kind {
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.clone().into_owned(),
            },
            _ => {
                let path = error
                    .path
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(".");
                if path.is_empty() {
                    ConfigError::Other(format!("{error}"))
                } else {
                    ConfigError::Other(format!("{error} (key `{path}`)"))
                }
            }
        };
        errors.push(config_error);
    }
    errors
}

/// Render collected configuration errors to stderr via miette.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        let report = miette::Report::msg(error.to_string());
        eprintln!("{report:?}");
        if let Some(help) = error.help() {
            eprintln!("  help: {help}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_has_help_text() {
        let err = ConfigError::MissingKey {
            key: "azure.api_key".into(),
        };
        assert_eq!(err.to_string(), "missing required key `azure.api_key`");
        let help = err.help().expect("help text").to_string();
        assert!(help.contains("CREWDESK_"));
    }

    #[test]
    fn figment_errors_carry_key_paths() {
        let err = crate::loader::load_config_from_str("[server]\nport = \"not-a-port\"\n")
            .unwrap_err();
        let errors = figment_to_config_errors(err);
        assert!(!errors.is_empty());
        assert!(errors[0].to_string().contains("port"));
    }
}
