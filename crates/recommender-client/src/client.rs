//! Endpoint methods for the recommender API.

use std::sync::Arc;

use recommender_api_models::{
    AcceleratorRange, ListModelServerVersionsResponse, ListModelServersResponse,
    ListModelsResponse, ManifestBundle, Model, ModelAndServerPair, ModelServer,
    ModelServerVersion,
};
use recommender_config::RecommenderConfig;
use reqwest::Client;
use url::Url;

use crate::credentials::{Credentials, credentials_from_config};
use crate::error::{ClientError, ClientResult};
use crate::transport::Transport;

const API_VERSION: &str = "v1alpha1";
const NO_QUERY: &[(&str, &str)] = &[];

/// Parameters of an optimized manifest request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestRequest {
    /// Model to deploy.
    pub model_name: String,
    /// Model server to deploy it with.
    pub model_server_name: String,
    /// Model server version.
    pub model_server_version: String,
    /// Accelerator to target.
    pub accelerator_type: String,
    /// Latency target; zero or negative leaves the choice to the service.
    pub target_ntpot_milliseconds: i64,
}

impl ManifestRequest {
    /// Query parameters for this request, omitting an unset latency target.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (
                "model_and_model_server_info.model_name",
                self.model_name.clone(),
            ),
            (
                "model_and_model_server_info.model_server_name",
                self.model_server_name.clone(),
            ),
            (
                "model_and_model_server_info.model_server_version",
                self.model_server_version.clone(),
            ),
            ("accelerator_type", self.accelerator_type.clone()),
        ];
        if self.target_ntpot_milliseconds > 0 {
            pairs.push((
                "target_ntpot_milliseconds",
                self.target_ntpot_milliseconds.to_string(),
            ));
        }
        pairs
    }
}

/// Client for the recommender API. Every method issues exactly one request.
#[derive(Clone)]
pub struct RecommenderClient {
    transport: Transport,
}

impl RecommenderClient {
    /// Build a client for `config`, tagging requests with `request_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::HttpClient`] when the HTTP client cannot be
    /// built and [`ClientError::InvalidHeader`] when `request_id` is not a
    /// valid header value.
    pub fn new(config: &RecommenderConfig, request_id: &str) -> ClientResult<Self> {
        let http = Client::builder()
            .build()
            .map_err(|source| ClientError::HttpClient { source })?;
        let credentials = credentials_from_config(&config.credentials, &http);
        tracing::debug!(
            credentials = credentials.kind(),
            base_url = %config.base_url,
            "recommender client ready"
        );
        let transport = Transport::new(http, config.base_url.clone(), credentials)
            .with_request_id(request_id)?;
        Ok(Self { transport })
    }

    /// Build a client from explicit parts.
    #[must_use]
    pub fn from_parts(http: Client, base_url: Url, credentials: Arc<dyn Credentials>) -> Self {
        Self {
            transport: Transport::new(http, base_url, credentials),
        }
    }

    /// `GET /v1alpha1/models`
    ///
    /// # Errors
    ///
    /// Propagates any [`ClientError`] from the transport.
    pub async fn list_models(&self) -> ClientResult<Vec<Model>> {
        let response: ListModelsResponse = self
            .transport
            .get(&[API_VERSION, "models"], NO_QUERY)
            .await?;
        Ok(response.into_models())
    }

    /// `GET /v1alpha1/modelServers?model_name=`
    ///
    /// # Errors
    ///
    /// Propagates any [`ClientError`] from the transport.
    pub async fn list_model_servers(&self, model_name: &str) -> ClientResult<Vec<ModelServer>> {
        let response: ListModelServersResponse = self
            .transport
            .get(&[API_VERSION, "modelServers"], &[("model_name", model_name)])
            .await?;
        Ok(response.into_model_servers())
    }

    /// `GET /v1alpha1/modelServers/{server}/versions?model_name=`
    ///
    /// # Errors
    ///
    /// Propagates any [`ClientError`] from the transport.
    pub async fn list_model_server_versions(
        &self,
        model_name: &str,
        model_server_name: &str,
    ) -> ClientResult<Vec<ModelServerVersion>> {
        let response: ListModelServerVersionsResponse = self
            .transport
            .get(
                &[API_VERSION, "modelServers", model_server_name, "versions"],
                &[("model_name", model_name)],
            )
            .await?;
        Ok(response.into_versions())
    }

    /// `GET /v1alpha1/accelerators?model_name=&model_server_name=`
    ///
    /// # Errors
    ///
    /// Propagates any [`ClientError`] from the transport.
    pub async fn list_accelerators(
        &self,
        model_name: &str,
        model_server_name: &str,
    ) -> ClientResult<AcceleratorRange> {
        self.transport
            .get(
                &[API_VERSION, "accelerators"],
                &[
                    ("model_name", model_name),
                    ("model_server_name", model_server_name),
                ],
            )
            .await
    }

    /// `GET /v1alpha1/optimizedManifest`
    ///
    /// # Errors
    ///
    /// Propagates any [`ClientError`] from the transport.
    pub async fn create_manifest(&self, request: &ManifestRequest) -> ClientResult<ManifestBundle> {
        self.transport
            .get(&[API_VERSION, "optimizedManifest"], &request.query_pairs())
            .await
    }

    /// `GET /v1alpha1/modelsAndServers`
    ///
    /// # Errors
    ///
    /// Propagates any [`ClientError`] from the transport.
    pub async fn list_models_and_servers(&self) -> ClientResult<Vec<ModelAndServerPair>> {
        self.transport
            .get(&[API_VERSION, "modelsAndServers"], NO_QUERY)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{AmbientCredentials, ApiKeyCredentials};
    use crate::token::StaticToken;
    use crate::transport::{HEADER_REQUEST_ID, HEADER_USER_PROJECT};
    use anyhow::{Result, anyhow};
    use httpmock::prelude::*;
    use recommender_config::ConfigSources;
    use serde_json::json;

    fn api_key_client(server: &MockServer) -> Result<RecommenderClient> {
        Ok(RecommenderClient::from_parts(
            Client::new(),
            server.base_url().parse()?,
            Arc::new(ApiKeyCredentials::new("test-key")),
        ))
    }

    fn manifest_request(target: i64) -> ManifestRequest {
        ManifestRequest {
            model_name: "gemma-2b".into(),
            model_server_name: "vllm".into(),
            model_server_version: "v0.6.0".into(),
            accelerator_type: "nvidia-l4".into(),
            target_ntpot_milliseconds: target,
        }
    }

    #[tokio::test]
    async fn list_models_preserves_order() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1alpha1/models")
                .query_param("key", "test-key");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"modelNames": ["a", "b"]}));
        });

        let models = api_key_client(&server)?.list_models().await?;
        assert_eq!(
            models,
            vec![Model { name: "a".into() }, Model { name: "b".into() }]
        );
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn list_model_servers_sends_model_name() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1alpha1/modelServers")
                .query_param("model_name", "gemma-2b")
                .query_param("key", "test-key");
            then.status(200)
                .json_body(json!({"modelServerNames": ["vllm", "tgi"]}));
        });

        let servers = api_key_client(&server)?
            .list_model_servers("gemma-2b")
            .await?;
        let names: Vec<_> = servers.into_iter().map(|server| server.name).collect();
        assert_eq!(names, ["vllm", "tgi"]);
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn list_model_server_versions_addresses_server_path() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1alpha1/modelServers/vllm/versions")
                .query_param("model_name", "gemma-2b")
                .query_param("key", "test-key");
            then.status(200)
                .json_body(json!({"modelServerVersions": ["v0.5.0", "v0.6.0"]}));
        });

        let versions = api_key_client(&server)?
            .list_model_server_versions("gemma-2b", "vllm")
            .await?;
        assert_eq!(
            versions,
            vec![
                ModelServerVersion {
                    name: "v0.5.0".into()
                },
                ModelServerVersion {
                    name: "v0.6.0".into()
                }
            ]
        );
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn list_accelerators_maps_range() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1alpha1/accelerators")
                .query_param("model_name", "gemma-2b")
                .query_param("model_server_name", "vllm")
                .query_param("key", "test-key");
            then.status(200).json_body(json!({
                "minTpotMilliseconds": 10,
                "maxTpotMilliseconds": 50,
                "acceleratorOptions": [{
                    "acceleratorType": "tpu-v5e",
                    "modelAndModelServerInfo": {
                        "modelName": "gemma-2b",
                        "modelServerName": "vllm",
                        "modelServerVersion": "v0.6.0"
                    },
                    "tpuTopology": "2x2",
                    "resourcesUsed": {"acceleratorCount": 4},
                    "performanceStats": {
                        "tpotMilliseconds": 20,
                        "queriesPerSecond": 5,
                        "outputTokensPerSecond": 900,
                        "ntpotMilliseconds": 22
                    }
                }]
            }));
        });

        let range = api_key_client(&server)?
            .list_accelerators("gemma-2b", "vllm")
            .await?;
        assert_eq!(range.min_tpot_milliseconds, 10);
        assert_eq!(range.max_tpot_milliseconds, 50);
        let option = range
            .accelerator_options
            .first()
            .ok_or_else(|| anyhow!("expected one option"))?;
        assert_eq!(option.tpu_topology(), Some("2x2"));
        assert_eq!(option.machine_type(), None);
        assert_eq!(option.resources_used.accelerator_count, 4);
        assert_eq!(option.performance_stats.output_tokens_per_second, 900);
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn create_manifest_sends_every_parameter_and_key() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1alpha1/optimizedManifest")
                .query_param("model_and_model_server_info.model_name", "gemma-2b")
                .query_param("model_and_model_server_info.model_server_name", "vllm")
                .query_param("model_and_model_server_info.model_server_version", "v0.6.0")
                .query_param("accelerator_type", "nvidia-l4")
                .query_param("target_ntpot_milliseconds", "200")
                .query_param("key", "test-key");
            then.status(200).json_body(json!({
                "k8sManifests": [{
                    "kind": "Deployment",
                    "apiVersion": "apps/v1",
                    "content": "apiVersion: apps/v1\nkind: Deployment\n"
                }],
                "comments": ["autoscaling not configured"]
            }));
        });

        let bundle = api_key_client(&server)?
            .create_manifest(&manifest_request(200))
            .await?;
        assert_eq!(bundle.k8s_manifests.len(), 1);
        assert_eq!(bundle.k8s_manifests[0].api_version, "apps/v1");
        assert_eq!(bundle.comments, ["autoscaling not configured"]);
        mock.assert();
        Ok(())
    }

    #[test]
    fn manifest_query_omits_unset_target() {
        let pairs = manifest_request(0).query_pairs();
        assert_eq!(pairs.len(), 4);
        assert!(
            pairs
                .iter()
                .all(|(name, _)| *name != "target_ntpot_milliseconds")
        );

        let negative = manifest_request(-5).query_pairs();
        assert!(
            negative
                .iter()
                .all(|(name, _)| *name != "target_ntpot_milliseconds")
        );

        let with_target = manifest_request(150).query_pairs();
        assert!(with_target.contains(&("target_ntpot_milliseconds", "150".to_string())));
    }

    #[tokio::test]
    async fn list_models_and_servers_decodes_array() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1alpha1/modelsAndServers")
                .query_param("key", "test-key");
            then.status(200).json_body(json!([{
                "modelName": "gemma-2b",
                "modelServerName": "vllm",
                "createTime": "2025-01-01T00:00:00Z",
                "updateTime": "2025-02-01T00:00:00Z"
            }]));
        });

        let pairs = api_key_client(&server)?.list_models_and_servers().await?;
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].model_name, "gemma-2b");
        assert_eq!(pairs[0].create_time, "2025-01-01T00:00:00Z");
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_carries_code_and_body() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v1alpha1/models");
            then.status(400).body("bad request");
        });

        let err = api_key_client(&server)?
            .list_models()
            .await
            .err()
            .ok_or_else(|| anyhow!("expected failure"))?;
        assert!(matches!(err, ClientError::Status { status: 400, .. }));
        let message = err.to_string();
        assert!(message.contains("400"), "unexpected message: {message}");
        assert!(message.contains("bad request"), "unexpected message: {message}");
        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v1alpha1/models");
            then.status(200).body("{not json");
        });

        let result = api_key_client(&server)?.list_models().await;
        assert!(matches!(result, Err(ClientError::Decode { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn schema_mismatch_is_a_decode_error() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v1alpha1/accelerators");
            then.status(200)
                .json_body(json!({"minTpotMilliseconds": "fast"}));
        });

        let result = api_key_client(&server)?
            .list_accelerators("m", "s")
            .await;
        assert!(matches!(result, Err(ClientError::Decode { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() -> Result<()> {
        let client = RecommenderClient::from_parts(
            Client::new(),
            "http://127.0.0.1:1".parse()?,
            Arc::new(ApiKeyCredentials::new("k")),
        );
        let result = client.list_models().await;
        assert!(matches!(result, Err(ClientError::Network { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn ambient_credentials_send_bearer_and_project() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1alpha1/models")
                .header("authorization", "Bearer ya29.test")
                .header(HEADER_USER_PROJECT, "my-project");
            then.status(200).json_body(json!({"modelNames": []}));
        });

        let client = RecommenderClient::from_parts(
            Client::new(),
            server.base_url().parse()?,
            Arc::new(AmbientCredentials::new(
                "my-project",
                Box::new(StaticToken::new("ya29.test")),
            )),
        );
        assert!(client.list_models().await?.is_empty());
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn client_from_config_tags_request_id() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1alpha1/models")
                .header(HEADER_REQUEST_ID, "trace-123")
                .query_param("key", "cfg-key");
            then.status(200).json_body(json!({"modelNames": ["m"]}));
        });

        let base_url = server.base_url();
        let config = RecommenderConfig::resolve(ConfigSources {
            base_url: Some(base_url),
            api_key: Some("cfg-key".into()),
            ..ConfigSources::default()
        })?;
        let client = RecommenderClient::new(&config, "trace-123")?;
        assert_eq!(client.list_models().await?.len(), 1);
        mock.assert();
        Ok(())
    }
}
