use std::io::Write;

use anyhow::Context;

use crate::cli::{ModelServerArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::commands::require_value;
use crate::output::render_accelerators;

pub(crate) async fn handle_accelerators_list<W: Write + Send>(
    ctx: &AppContext,
    args: ModelServerArgs,
    format: OutputFormat,
    out: &mut W,
) -> CliResult<()> {
    let model = require_value("model", &args.model)?;
    let model_server = require_value("model-server", &args.model_server)?;
    let range = ctx
        .client
        .list_accelerators(model, model_server)
        .await
        .context("failed to list accelerators")
        .map_err(CliError::failure)?;
    tracing::debug!(
        options = range.accelerator_options.len(),
        "listed accelerators"
    );
    render_accelerators(out, &range, format)
}
