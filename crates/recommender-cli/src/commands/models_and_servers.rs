use std::io::Write;

use anyhow::Context;

use crate::cli::OutputFormat;
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_models_and_servers;

pub(crate) async fn handle_models_and_servers_list<W: Write + Send>(
    ctx: &AppContext,
    format: OutputFormat,
    out: &mut W,
) -> CliResult<()> {
    let pairs = ctx
        .client
        .list_models_and_servers()
        .await
        .context("failed to list models and servers")
        .map_err(CliError::failure)?;
    render_models_and_servers(out, &pairs, format)
}
