//! Error types and the shared application context for the CLI.

use std::fmt::{self, Display, Formatter};

use recommender_client::RecommenderClient;
use recommender_config::{ConfigError, ConfigSources, RecommenderConfig};

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        Self::Validation(format!("{:#}", anyhow::Error::new(error)))
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: RecommenderClient,
}

impl AppContext {
    /// Resolve configuration and build the API client.
    ///
    /// Configuration problems surface as validation errors before any request
    /// is attempted.
    pub(crate) fn from_sources(sources: ConfigSources, trace_id: &str) -> CliResult<Self> {
        let config = RecommenderConfig::resolve(sources)?;
        let client = RecommenderClient::new(&config, trace_id).map_err(CliError::failure)?;
        Ok(Self { client })
    }
}
