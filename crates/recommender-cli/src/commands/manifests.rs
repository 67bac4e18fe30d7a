use std::io::Write;

use anyhow::Context;
use recommender_client::ManifestRequest;

use crate::cli::{ManifestCreateArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::commands::require_value;
use crate::output::render_manifests;

pub(crate) async fn handle_manifests_create<W: Write + Send>(
    ctx: &AppContext,
    args: ManifestCreateArgs,
    format: OutputFormat,
    out: &mut W,
) -> CliResult<()> {
    let request = ManifestRequest {
        model_name: require_value("model", &args.model)?.to_string(),
        model_server_name: require_value("model-server", &args.model_server)?.to_string(),
        model_server_version: require_value("model-server-version", &args.model_server_version)?
            .to_string(),
        accelerator_type: require_value("accelerator-type", &args.accelerator_type)?.to_string(),
        target_ntpot_milliseconds: args.target_ntpot_milliseconds,
    };

    let bundle = ctx
        .client
        .create_manifest(&request)
        .await
        .context("failed to create manifest")
        .map_err(CliError::failure)?;
    tracing::debug!(
        manifests = bundle.k8s_manifests.len(),
        comments = bundle.comments.len(),
        "created manifest"
    );
    render_manifests(out, &bundle, format)
}
