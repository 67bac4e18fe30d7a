#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the model-serving recommender API.
//!
//! The recommender service speaks proto3-flavoured JSON: keys are
//! lowerCamelCase and zero values (empty lists, `0`, `""`) are omitted from the
//! payload. Every scalar and list therefore falls back to its default when the
//! key is missing. The list endpoints return bare string arrays which the
//! client rehydrates into the name-only records below.
use serde::{Deserialize, Serialize};

/// A model known to the recommender.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Model {
    /// Model identifier, e.g. `meta-llama/Llama-3.1-8B-Instruct`.
    pub name: String,
}

/// A model server capable of serving a model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelServer {
    /// Model server identifier, e.g. `vllm`.
    pub name: String,
}

/// A released version of a model server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelServerVersion {
    /// Version label.
    pub name: String,
}

/// Body of `GET /v1alpha1/models`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListModelsResponse {
    /// Model names in service order.
    #[serde(default)]
    pub model_names: Vec<String>,
}

impl ListModelsResponse {
    /// Rehydrate the names into [`Model`] records, preserving order.
    #[must_use]
    pub fn into_models(self) -> Vec<Model> {
        self.model_names
            .into_iter()
            .map(|name| Model { name })
            .collect()
    }
}

/// Body of `GET /v1alpha1/modelServers`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListModelServersResponse {
    /// Model server names in service order.
    #[serde(default)]
    pub model_server_names: Vec<String>,
}

impl ListModelServersResponse {
    /// Rehydrate the names into [`ModelServer`] records, preserving order.
    #[must_use]
    pub fn into_model_servers(self) -> Vec<ModelServer> {
        self.model_server_names
            .into_iter()
            .map(|name| ModelServer { name })
            .collect()
    }
}

/// Body of `GET /v1alpha1/modelServers/{server}/versions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListModelServerVersionsResponse {
    /// Version labels in service order.
    #[serde(default)]
    pub model_server_versions: Vec<String>,
}

impl ListModelServerVersionsResponse {
    /// Rehydrate the labels into [`ModelServerVersion`] records, preserving order.
    #[must_use]
    pub fn into_versions(self) -> Vec<ModelServerVersion> {
        self.model_server_versions
            .into_iter()
            .map(|name| ModelServerVersion { name })
            .collect()
    }
}

/// Identifies the model/server/version triple an option applies to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelAndModelServerInfo {
    /// Model identifier.
    pub model_name: String,
    /// Model server identifier.
    pub model_server_name: String,
    /// Model server version label.
    pub model_server_version: String,
}

/// Hardware consumed by an accelerator option.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourcesUsed {
    /// Number of accelerators attached to a single replica.
    pub accelerator_count: i64,
}

/// Benchmarked serving performance for an accelerator option.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceStats {
    /// Time per output token.
    pub tpot_milliseconds: i64,
    /// Sustained queries per second.
    pub queries_per_second: i64,
    /// Output token throughput.
    pub output_tokens_per_second: i64,
    /// Normalized time per output token.
    pub ntpot_milliseconds: i64,
}

/// One accelerator configuration able to serve the requested model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AcceleratorOption {
    /// Accelerator type, e.g. `nvidia-l4`.
    #[serde(default)]
    pub accelerator_type: String,
    /// Model/server/version the option was benchmarked with.
    #[serde(default)]
    pub model_and_model_server_info: ModelAndModelServerInfo,
    /// Machine type hosting the accelerator, when the service reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_type: Option<String>,
    /// TPU slice topology, reported for TPU accelerators only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpu_topology: Option<String>,
    /// Hardware consumed per replica.
    #[serde(default)]
    pub resources_used: ResourcesUsed,
    /// Benchmarked performance.
    #[serde(default)]
    pub performance_stats: PerformanceStats,
}

impl AcceleratorOption {
    /// Machine type, treating an empty string as absent.
    #[must_use]
    pub fn machine_type(&self) -> Option<&str> {
        non_empty(self.machine_type.as_deref())
    }

    /// TPU topology, treating an empty string as absent.
    #[must_use]
    pub fn tpu_topology(&self) -> Option<&str> {
        non_empty(self.tpu_topology.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// Body of `GET /v1alpha1/accelerators`: the latency/throughput envelope plus
/// every option inside it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AcceleratorRange {
    /// Accelerator options in service order.
    pub accelerator_options: Vec<AcceleratorOption>,
    /// Lowest TPOT across options.
    pub min_tpot_milliseconds: i64,
    /// Highest TPOT across options.
    pub max_tpot_milliseconds: i64,
    /// Lowest throughput across options.
    pub min_throughput_tokens_per_second: i64,
    /// Highest throughput across options.
    pub max_throughput_tokens_per_second: i64,
    /// Lowest NTPOT across options.
    pub min_ntpot_milliseconds: i64,
    /// Highest NTPOT across options.
    pub max_ntpot_milliseconds: i64,
}

/// A single generated Kubernetes object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct K8sManifest {
    /// Object kind, e.g. `Deployment`.
    pub kind: String,
    /// Object API version, e.g. `apps/v1`.
    pub api_version: String,
    /// Rendered YAML document.
    pub content: String,
}

/// Body of `GET /v1alpha1/optimizedManifest`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ManifestBundle {
    /// Generated objects in apply order.
    pub k8s_manifests: Vec<K8sManifest>,
    /// Free-form notes from the generator.
    pub comments: Vec<String>,
}

/// Element of the `GET /v1alpha1/modelsAndServers` array.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelAndServerPair {
    /// Model identifier.
    pub model_name: String,
    /// Model server identifier.
    pub model_server_name: String,
    /// Creation timestamp as sent by the service.
    pub create_time: String,
    /// Last update timestamp as sent by the service.
    pub update_time: String,
}
