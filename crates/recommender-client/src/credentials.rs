//! Credential capability attached to every outgoing request.

use std::sync::Arc;

use async_trait::async_trait;
use recommender_config::CredentialConfig;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::token::{ApplicationDefaultTokenSource, StaticToken, TokenSource};
use crate::transport::HEADER_USER_PROJECT;

/// Query parameter carrying a static API key.
pub const API_KEY_PARAM: &str = "key";

/// Decorates a request with credential material.
#[async_trait]
pub trait Credentials: Send + Sync {
    /// Short label for logs.
    fn kind(&self) -> &'static str;

    /// Attach credentials to the request URL and/or headers.
    async fn authorize(&self, url: &mut Url, headers: &mut HeaderMap) -> ClientResult<()>;
}

/// Appends `key=<api key>` to the query string.
pub struct ApiKeyCredentials {
    api_key: String,
}

impl ApiKeyCredentials {
    /// Wrap a static API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Credentials for ApiKeyCredentials {
    fn kind(&self) -> &'static str {
        "api_key"
    }

    async fn authorize(&self, url: &mut Url, _headers: &mut HeaderMap) -> ClientResult<()> {
        url.query_pairs_mut()
            .append_pair(API_KEY_PARAM, &self.api_key);
        Ok(())
    }
}

/// Sends a bearer token plus the billing project header.
pub struct AmbientCredentials {
    project_id: String,
    token_source: Box<dyn TokenSource>,
}

impl AmbientCredentials {
    /// Bill requests to `project_id`, minting tokens from `token_source`.
    #[must_use]
    pub fn new(project_id: impl Into<String>, token_source: Box<dyn TokenSource>) -> Self {
        Self {
            project_id: project_id.into(),
            token_source,
        }
    }
}

#[async_trait]
impl Credentials for AmbientCredentials {
    fn kind(&self) -> &'static str {
        "ambient"
    }

    async fn authorize(&self, _url: &mut Url, headers: &mut HeaderMap) -> ClientResult<()> {
        let token = self.token_source.access_token().await?;
        let mut bearer = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            ClientError::credentials(format!(
                "token from {} contains invalid header characters",
                self.token_source.name()
            ))
        })?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let project = HeaderValue::from_str(&self.project_id).map_err(|_| {
            ClientError::credentials("project id contains invalid header characters")
        })?;
        headers.insert(HEADER_USER_PROJECT, project);
        Ok(())
    }
}

/// Select the credential implementation matching the resolved configuration.
#[must_use]
pub fn credentials_from_config(config: &CredentialConfig, http: &Client) -> Arc<dyn Credentials> {
    match config {
        CredentialConfig::ApiKey { api_key } => Arc::new(ApiKeyCredentials::new(api_key.clone())),
        CredentialConfig::Ambient {
            project_id,
            access_token,
        } => {
            let token_source: Box<dyn TokenSource> = match access_token {
                Some(token) => Box::new(StaticToken::new(token.clone())),
                None => Box::new(ApplicationDefaultTokenSource::new(http.clone())),
            };
            Arc::new(AmbientCredentials::new(project_id.clone(), token_source))
        }
    }
}
