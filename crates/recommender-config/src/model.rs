//! Typed configuration resolved from flags and the environment.

use std::fmt::{self, Debug, Formatter};

use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::validate::{non_blank, parse_base_url};

/// Environment variable holding the recommender API base URL.
pub const ENV_BASE_URL: &str = "BASE_URL";
/// Environment variable holding the billing project for ambient credentials.
pub const ENV_PROJECT_ID: &str = "PROJECT_ID";
/// Environment variable holding a static API key.
pub const ENV_API_KEY: &str = "API_KEY";
/// Environment variable holding a pre-minted OAuth access token.
pub const ENV_ACCESS_TOKEN: &str = "CLOUDSDK_AUTH_ACCESS_TOKEN";

/// Raw, unvalidated configuration inputs.
#[derive(Default, Clone)]
pub struct ConfigSources {
    /// Candidate base URL.
    pub base_url: Option<String>,
    /// Candidate billing project.
    pub project_id: Option<String>,
    /// Candidate API key.
    pub api_key: Option<String>,
    /// Candidate pre-minted access token.
    pub access_token: Option<String>,
}

impl Debug for ConfigSources {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ConfigSources")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("access_token", &self.access_token.as_ref().map(|_| REDACTED))
            .finish()
    }
}

const REDACTED: &str = "<redacted>";

/// Credential material selected at startup.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialConfig {
    /// Static API key appended as the `key` query parameter.
    ApiKey {
        /// The key value.
        api_key: String,
    },
    /// Bearer token from the ambient credential chain, billed to `project_id`.
    Ambient {
        /// Project sent in `X-Goog-User-Project`.
        project_id: String,
        /// Pre-minted token that short-circuits the credential chain.
        access_token: Option<String>,
    },
}

impl CredentialConfig {
    /// Short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ApiKey { .. } => "api_key",
            Self::Ambient { .. } => "ambient",
        }
    }
}

impl Debug for CredentialConfig {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey { .. } => formatter
                .debug_struct("ApiKey")
                .field("api_key", &REDACTED)
                .finish(),
            Self::Ambient {
                project_id,
                access_token,
            } => formatter
                .debug_struct("Ambient")
                .field("project_id", project_id)
                .field("access_token", &access_token.as_ref().map(|_| REDACTED))
                .finish(),
        }
    }
}

/// Validated configuration handed to the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommenderConfig {
    /// Base URL every API path is appended to.
    pub base_url: Url,
    /// Selected credential variant.
    pub credentials: CredentialConfig,
}

impl RecommenderConfig {
    /// Validate raw sources into a usable configuration.
    ///
    /// An API key, when present, selects the API key variant; otherwise a
    /// project id is required for the ambient variant.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVariable`] when no base URL is set,
    /// [`ConfigError::MissingCredentials`] when neither an API key nor a project
    /// id is set, and a URL error when the base URL is unusable.
    pub fn resolve(sources: ConfigSources) -> ConfigResult<Self> {
        let raw_base_url = non_blank(sources.base_url).ok_or(ConfigError::MissingVariable {
            variable: ENV_BASE_URL,
        })?;
        let base_url = parse_base_url(&raw_base_url)?;

        let credentials = match (
            non_blank(sources.api_key),
            non_blank(sources.project_id),
        ) {
            (Some(api_key), _) => CredentialConfig::ApiKey { api_key },
            (None, Some(project_id)) => CredentialConfig::Ambient {
                project_id,
                access_token: non_blank(sources.access_token),
            },
            (None, None) => {
                return Err(ConfigError::MissingCredentials {
                    api_key: ENV_API_KEY,
                    project_id: ENV_PROJECT_ID,
                });
            }
        };

        tracing::debug!(
            base_url = %base_url,
            credentials = credentials.kind(),
            "resolved recommender configuration"
        );

        Ok(Self {
            base_url,
            credentials,
        })
    }
}
