use std::io::Write;

use anyhow::Context;

use crate::cli::{ModelArgs, ModelServerArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::commands::require_value;
use crate::output::render_names;

pub(crate) async fn handle_models_list<W: Write + Send>(
    ctx: &AppContext,
    format: OutputFormat,
    out: &mut W,
) -> CliResult<()> {
    let models = ctx
        .client
        .list_models()
        .await
        .context("failed to list models")
        .map_err(CliError::failure)?;
    tracing::debug!(count = models.len(), "listed models");
    render_names(out, &models, format, |model| model.name.as_str())
}

pub(crate) async fn handle_model_servers_list<W: Write + Send>(
    ctx: &AppContext,
    args: ModelArgs,
    format: OutputFormat,
    out: &mut W,
) -> CliResult<()> {
    let model = require_value("model", &args.model)?;
    let servers = ctx
        .client
        .list_model_servers(model)
        .await
        .context("failed to list model servers")
        .map_err(CliError::failure)?;
    tracing::debug!(count = servers.len(), model, "listed model servers");
    render_names(out, &servers, format, |server| server.name.as_str())
}

pub(crate) async fn handle_model_server_versions_list<W: Write + Send>(
    ctx: &AppContext,
    args: ModelServerArgs,
    format: OutputFormat,
    out: &mut W,
) -> CliResult<()> {
    let model = require_value("model", &args.model)?;
    let model_server = require_value("model-server", &args.model_server)?;
    let versions = ctx
        .client
        .list_model_server_versions(model, model_server)
        .await
        .context("failed to list model server versions")
        .map_err(CliError::failure)?;
    render_names(out, &versions, format, |version| version.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{TEST_KEY, context_for, context_with, stdout_text};
    use anyhow::{Result, anyhow};
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn models_list_prints_names_in_order() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1alpha1/models")
                .query_param("key", TEST_KEY);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"modelNames": ["gemma-2b", "llama-3-8b"]}));
        });

        let ctx = context_with(&server)?;
        let mut out = Vec::new();
        handle_models_list(&ctx, OutputFormat::Table, &mut out).await?;
        assert_eq!(stdout_text(out)?, "Name: gemma-2b\nName: llama-3-8b\n");
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn model_servers_list_renders_json() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1alpha1/modelServers")
                .query_param("model_name", "gemma-2b");
            then.status(200)
                .json_body(json!({"modelServerNames": ["vllm"]}));
        });

        let ctx = context_with(&server)?;
        let mut out = Vec::new();
        handle_model_servers_list(
            &ctx,
            ModelArgs {
                model: "gemma-2b".into(),
            },
            OutputFormat::Json,
            &mut out,
        )
        .await?;
        let value: serde_json::Value = serde_json::from_slice(&out)?;
        assert_eq!(value, json!([{"name": "vllm"}]));
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn model_server_versions_list_targets_server_path() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1alpha1/modelServers/vllm/versions")
                .query_param("model_name", "gemma-2b");
            then.status(200)
                .json_body(json!({"modelServerVersions": ["v0.6.0"]}));
        });

        let ctx = context_with(&server)?;
        let mut out = Vec::new();
        handle_model_server_versions_list(
            &ctx,
            ModelServerArgs {
                model: "gemma-2b".into(),
                model_server: "vllm".into(),
            },
            OutputFormat::Table,
            &mut out,
        )
        .await?;
        assert_eq!(stdout_text(out)?, "Name: v0.6.0\n");
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn blank_model_is_rejected_before_request() -> Result<()> {
        let ctx = context_for("http://127.0.0.1:1")?;
        let mut out = Vec::new();
        let result = handle_model_servers_list(
            &ctx,
            ModelArgs { model: " ".into() },
            OutputFormat::Table,
            &mut out,
        )
        .await;
        assert!(matches!(result, Err(CliError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn api_failure_reports_status_and_body() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v1alpha1/models");
            then.status(400).body("bad request");
        });

        let ctx = context_with(&server)?;
        let mut out = Vec::new();
        let err = handle_models_list(&ctx, OutputFormat::Table, &mut out)
            .await
            .err()
            .ok_or_else(|| anyhow!("expected failure"))?;
        assert_eq!(err.exit_code(), 3);
        let message = err.display_message();
        assert!(message.contains("400"), "unexpected message: {message}");
        assert!(message.contains("bad request"), "unexpected message: {message}");
        assert!(out.is_empty());
        Ok(())
    }
}
