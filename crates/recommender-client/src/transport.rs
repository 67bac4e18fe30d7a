//! Authenticated GET transport shared by every endpoint.

use std::sync::Arc;

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

use crate::credentials::{API_KEY_PARAM, Credentials};
use crate::error::{ClientError, ClientResult};

/// Header carrying the per-invocation trace identifier.
pub const HEADER_REQUEST_ID: &str = "x-request-id";
/// Header naming the project billed for ambient-credential calls.
pub const HEADER_USER_PROJECT: &str = "x-goog-user-project";

const REDACTED: &str = "<redacted>";

/// Issues authenticated GET requests relative to a base URL and decodes JSON
/// bodies straight into the caller's target type.
#[derive(Clone)]
pub struct Transport {
    http: Client,
    base_url: Url,
    credentials: Arc<dyn Credentials>,
    request_id: Option<HeaderValue>,
}

impl Transport {
    /// Assemble a transport from its parts.
    #[must_use]
    pub fn new(http: Client, base_url: Url, credentials: Arc<dyn Credentials>) -> Self {
        Self {
            http,
            base_url,
            credentials,
            request_id: None,
        }
    }

    /// Tag every request with `x-request-id: <request_id>`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidHeader`] when the identifier is not a
    /// valid header value.
    pub fn with_request_id(mut self, request_id: &str) -> ClientResult<Self> {
        let value = HeaderValue::from_str(request_id).map_err(|_| ClientError::InvalidHeader {
            name: HEADER_REQUEST_ID,
        })?;
        self.request_id = Some(value);
        Ok(self)
    }

    /// Build the URL for `segments` under the base URL's path.
    ///
    /// Segments are percent-encoded individually, so a value containing `/`
    /// stays a single segment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] when the base URL cannot carry a path.
    pub fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl {
                path: segments.join("/"),
                reason: "base URL cannot carry a path",
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Perform an authenticated GET and decode the JSON body as `T`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidUrl`] when the URL cannot be assembled.
    /// - [`ClientError::Credentials`] when credentials cannot be attached.
    /// - [`ClientError::Network`] when no response is received.
    /// - [`ClientError::Status`] for any non-success status, carrying the body.
    /// - [`ClientError::Decode`] when the body does not match `T`.
    pub async fn get<T, K, V>(&self, segments: &[&str], query: &[(K, V)]) -> ClientResult<T>
    where
        T: DeserializeOwned,
        K: AsRef<str> + Sync,
        V: AsRef<str> + Sync,
    {
        let mut url = self.endpoint(segments)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name.as_ref(), value.as_ref());
            }
        }

        let mut headers = HeaderMap::new();
        if let Some(request_id) = &self.request_id {
            headers.insert(HEADER_REQUEST_ID, request_id.clone());
        }
        self.credentials.authorize(&mut url, &mut headers).await?;
        let path = url.path().to_string();

        tracing::debug!(
            url = %redact_url(&url),
            credentials = self.credentials.kind(),
            "sending request"
        );

        let response = self
            .http
            .get(url.clone())
            .headers(headers.clone())
            .send()
            .await
            .map_err(|source| ClientError::Network {
                path: path.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| ClientError::Network {
                path: path.clone(),
                source,
            })?;

        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                url = %redact_url(&url),
                headers = ?redact_headers(&headers),
                "request failed"
            );
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        serde_json::from_slice(&body).map_err(|source| ClientError::Decode { path, source })
    }
}

/// Render `url` with the API key query value masked.
#[must_use]
pub fn redact_url(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == API_KEY_PARAM {
                REDACTED.to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();
    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

/// Render request headers as `name: value` lines with secret values masked.
#[must_use]
pub fn redact_headers(headers: &HeaderMap) -> Vec<String> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if *name == AUTHORIZATION || value.is_sensitive() {
                REDACTED.into()
            } else {
                String::from_utf8_lossy(value.as_bytes()).into_owned()
            };
            format!("{name}: {shown}")
        })
        .collect()
}
