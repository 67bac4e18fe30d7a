//! Bearer token sources for ambient credentials.
//!
//! The chain mirrors application-default credential discovery: a token handed
//! in explicitly wins, then the local `gcloud` installation, then the compute
//! metadata server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::process::Command;

use crate::error::{ClientError, ClientResult};

/// Default metadata server token endpoint.
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

const METADATA_FLAVOR_HEADER: &str = "Metadata-Flavor";
const METADATA_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Something that can mint an OAuth access token.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Label used in logs and aggregated errors.
    fn name(&self) -> &'static str;

    /// Produce a bearer token.
    async fn access_token(&self) -> ClientResult<String>;
}

/// A token supplied up front.
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Wrap an existing token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn access_token(&self) -> ClientResult<String> {
        Ok(self.token.clone())
    }
}

/// Shells out to `gcloud auth application-default print-access-token`.
pub struct GcloudTokenSource {
    program: String,
    args: Vec<String>,
}

impl Default for GcloudTokenSource {
    fn default() -> Self {
        Self::with_command(
            "gcloud",
            ["auth", "application-default", "print-access-token"],
        )
    }
}

impl GcloudTokenSource {
    /// Use an alternative command whose stdout is the token.
    #[must_use]
    pub fn with_command<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl TokenSource for GcloudTokenSource {
    fn name(&self) -> &'static str {
        "gcloud"
    }

    async fn access_token(&self) -> ClientResult<String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|err| {
                ClientError::credentials(format!("failed to run {}: {err}", self.program))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClientError::credentials(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(ClientError::credentials(format!(
                "{} printed an empty token",
                self.program
            )));
        }
        Ok(token)
    }
}

/// Reads the default service account token from the compute metadata server.
pub struct MetadataServerTokenSource {
    http: Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
}

impl MetadataServerTokenSource {
    /// Query the well-known metadata endpoint.
    #[must_use]
    pub fn new(http: Client) -> Self {
        Self::with_endpoint(http, METADATA_TOKEN_URL)
    }

    /// Query a custom endpoint (emulators, tests).
    #[must_use]
    pub fn with_endpoint(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl TokenSource for MetadataServerTokenSource {
    fn name(&self) -> &'static str {
        "metadata"
    }

    async fn access_token(&self) -> ClientResult<String> {
        let response = self
            .http
            .get(&self.endpoint)
            .header(METADATA_FLAVOR_HEADER, "Google")
            .timeout(METADATA_PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|err| ClientError::credentials(format!("metadata server unreachable: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::credentials(format!(
                "metadata server answered {status}"
            )));
        }

        let token = response.json::<MetadataToken>().await.map_err(|err| {
            ClientError::credentials(format!("metadata token response invalid: {err}"))
        })?;
        Ok(token.access_token)
    }
}

/// Tries each source in order and returns the first token produced.
pub struct ApplicationDefaultTokenSource {
    sources: Vec<Box<dyn TokenSource>>,
}

impl ApplicationDefaultTokenSource {
    /// The standard chain: local `gcloud`, then the metadata server.
    #[must_use]
    pub fn new(http: Client) -> Self {
        Self::from_sources(vec![
            Box::new(GcloudTokenSource::default()),
            Box::new(MetadataServerTokenSource::new(http)),
        ])
    }

    /// Build a chain from explicit sources.
    #[must_use]
    pub fn from_sources(sources: Vec<Box<dyn TokenSource>>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl TokenSource for ApplicationDefaultTokenSource {
    fn name(&self) -> &'static str {
        "application-default"
    }

    async fn access_token(&self) -> ClientResult<String> {
        let mut failures = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            match source.access_token().await {
                Ok(token) => {
                    tracing::debug!(source = source.name(), "obtained access token");
                    return Ok(token);
                }
                Err(err) => {
                    tracing::debug!(source = source.name(), error = %err, "token source unavailable");
                    failures.push(format!("{}: {err}", source.name()));
                }
            }
        }
        Err(ClientError::credentials(format!(
            "no ambient credentials available ({})",
            failures.join("; ")
        )))
    }
}
