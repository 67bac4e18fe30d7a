//! Error types for configuration resolution.

use thiserror::Error;

/// Primary error type for configuration resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting was neither passed as a flag nor set in the environment.
    #[error("{variable} environment variable not set")]
    MissingVariable {
        /// Environment variable backing the setting.
        variable: &'static str,
    },
    /// Neither credential variant had the material it needs.
    #[error("no credentials configured: set {api_key} for API key access or {project_id} for ambient credentials")]
    MissingCredentials {
        /// Environment variable selecting the API key variant.
        api_key: &'static str,
        /// Environment variable required by the ambient variant.
        project_id: &'static str,
    },
    /// The base URL could not be parsed.
    #[error("invalid base URL '{value}'")]
    InvalidBaseUrl {
        /// Offending value.
        value: String,
        /// Parse failure.
        source: url::ParseError,
    },
    /// The base URL parsed but cannot address the API.
    #[error("invalid base URL '{value}': {reason}")]
    UnsupportedBaseUrl {
        /// Offending value.
        value: String,
        /// Machine-readable reason for the rejection.
        reason: &'static str,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
