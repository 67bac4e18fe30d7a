//! Output renderers for CLI commands.
//!
//! Table output keeps the line formats scripts built against `gcloud` already
//! parse; JSON output pretty-prints the typed records.

use std::io::{self, Write};

use anyhow::anyhow;
use recommender_api_models::{AcceleratorRange, ManifestBundle, ModelAndServerPair};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

/// Render name-only records, one `Name: <name>` line each.
pub(crate) fn render_names<W, T>(
    out: &mut W,
    records: &[T],
    format: OutputFormat,
    name: impl Fn(&T) -> &str,
) -> CliResult<()>
where
    W: Write,
    T: Serialize,
{
    match format {
        OutputFormat::Json => write_json(out, records),
        OutputFormat::Table => records
            .iter()
            .try_for_each(|record| writeln!(out, "Name: {}", name(record)))
            .map_err(write_failed),
    }
}

pub(crate) fn render_accelerators<W: Write>(
    out: &mut W,
    range: &AcceleratorRange,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => write_json(out, range),
        OutputFormat::Table => accelerator_table(out, range).map_err(write_failed),
    }
}

pub(crate) fn render_manifests<W: Write>(
    out: &mut W,
    bundle: &ManifestBundle,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => write_json(out, bundle),
        OutputFormat::Table => manifest_table(out, bundle).map_err(write_failed),
    }
}

pub(crate) fn render_models_and_servers<W: Write>(
    out: &mut W,
    pairs: &[ModelAndServerPair],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => write_json(out, pairs),
        OutputFormat::Table => pairs
            .iter()
            .try_for_each(|pair| {
                writeln!(
                    out,
                    "Model Name: {}, Model Server Name: {}, Create Time: {}, Update Time: {}",
                    pair.model_name, pair.model_server_name, pair.create_time, pair.update_time
                )
            })
            .map_err(write_failed),
    }
}

fn accelerator_table<W: Write>(out: &mut W, range: &AcceleratorRange) -> io::Result<()> {
    writeln!(out, "Min Tpot Milliseconds: {}", range.min_tpot_milliseconds)?;
    writeln!(out, "Max Tpot Milliseconds: {}", range.max_tpot_milliseconds)?;
    writeln!(
        out,
        "Min Throughput Tokens Per Second: {}",
        range.min_throughput_tokens_per_second
    )?;
    writeln!(
        out,
        "Max Throughput Tokens Per Second: {}",
        range.max_throughput_tokens_per_second
    )?;
    writeln!(out, "Min Ntpot Milliseconds: {}", range.min_ntpot_milliseconds)?;
    writeln!(out, "Max Ntpot Milliseconds: {}", range.max_ntpot_milliseconds)?;

    for option in &range.accelerator_options {
        let info = &option.model_and_model_server_info;
        let stats = &option.performance_stats;
        writeln!(out, "  Accelerator Type: {}", option.accelerator_type)?;
        writeln!(out, "    Model Name: {}", info.model_name)?;
        writeln!(out, "    Model Server Name: {}", info.model_server_name)?;
        writeln!(out, "    Model Server Version: {}", info.model_server_version)?;
        if let Some(machine_type) = option.machine_type() {
            writeln!(out, "    Machine Type: {machine_type}")?;
        }
        if let Some(topology) = option.tpu_topology() {
            writeln!(out, "    Tpu Topology: {topology}")?;
        }
        writeln!(
            out,
            "    Accelerator Count: {}",
            option.resources_used.accelerator_count
        )?;
        writeln!(out, "    Tpot Milliseconds: {}", stats.tpot_milliseconds)?;
        writeln!(out, "    Queries Per Second: {}", stats.queries_per_second)?;
        writeln!(
            out,
            "    Output Tokens Per Second: {}",
            stats.output_tokens_per_second
        )?;
        writeln!(out, "    Ntpot Milliseconds: {}", stats.ntpot_milliseconds)?;
    }
    Ok(())
}

fn manifest_table<W: Write>(out: &mut W, bundle: &ManifestBundle) -> io::Result<()> {
    for manifest in &bundle.k8s_manifests {
        writeln!(out, "K8s Manifest Kind: {}", manifest.kind)?;
        writeln!(out, "K8s Manifest API Version: {}", manifest.api_version)?;
        writeln!(out, "K8s Manifest Content: \n{}", manifest.content)?;
    }
    for comment in &bundle.comments {
        writeln!(out, "Comment: {comment}")?;
    }
    Ok(())
}

fn write_json<W, T>(out: &mut W, value: &T) -> CliResult<()>
where
    W: Write,
    T: Serialize + ?Sized,
{
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    writeln!(out, "{text}").map_err(write_failed)
}

fn write_failed(err: io::Error) -> CliError {
    CliError::failure(anyhow!("failed to write output: {err}"))
}
