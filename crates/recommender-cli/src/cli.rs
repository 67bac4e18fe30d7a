//! Command-line surface mirroring `gcloud container ai recommender`.

use std::io;

use clap::{Args, Parser, Subcommand, ValueEnum};
use recommender_config::{
    ENV_ACCESS_TOKEN, ENV_API_KEY, ENV_BASE_URL, ENV_PROJECT_ID, ConfigSources,
};
use recommender_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use tracing::Instrument;
use uuid::Uuid;

use crate::client::{AppContext, CliResult};
use crate::commands::accelerators::handle_accelerators_list;
use crate::commands::catalog::{
    handle_model_server_versions_list, handle_model_servers_list, handle_models_list,
};
use crate::commands::manifests::handle_manifests_create;
use crate::commands::models_and_servers::handle_models_and_servers_list;

const ENV_LOG_LEVEL: &str = "RECOMMENDER_LOG";

/// Parses CLI arguments, executes the requested command, and reports errors.
/// Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.map_or_else(LogFormat::infer, LogFormat::from),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err:#}");
    }

    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("command", command = command_name, trace_id = %trace_id);

    match execute(cli, &trace_id).instrument(span).await {
        Ok(()) => 0,
        Err(err) => {
            tracing::debug!(exit_code = err.exit_code(), "command failed");
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn execute(cli: Cli, trace_id: &str) -> CliResult<()> {
    let ctx = AppContext::from_sources(cli.connection.into_sources(), trace_id)?;
    dispatch(&ctx, cli.command, cli.format).await
}

async fn dispatch(ctx: &AppContext, command: Command, format: OutputFormat) -> CliResult<()> {
    let Command::Container(ContainerCommand::Ai(AiCommand::Recommender(command))) = command;
    let mut out = io::stdout();
    match command {
        RecommenderCommand::Models(ModelsCommand::List) => {
            handle_models_list(ctx, format, &mut out).await
        }
        RecommenderCommand::ModelServers(ModelServersCommand::List(args)) => {
            handle_model_servers_list(ctx, args, format, &mut out).await
        }
        RecommenderCommand::ModelServerVersions(ModelServerVersionsCommand::List(args)) => {
            handle_model_server_versions_list(ctx, args, format, &mut out).await
        }
        RecommenderCommand::Accelerators(AcceleratorsCommand::List(args)) => {
            handle_accelerators_list(ctx, args, format, &mut out).await
        }
        RecommenderCommand::Manifests(ManifestsCommand::Create(args)) => {
            handle_manifests_create(ctx, args, format, &mut out).await
        }
        RecommenderCommand::ModelsAndServers(ModelsAndServersCommand::List) => {
            handle_models_and_servers_list(ctx, format, &mut out).await
        }
    }
}

#[derive(Parser)]
#[command(
    name = "mock-gcloud",
    about = "Query the model-serving recommender API",
    version
)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) connection: ConnectionArgs,
    #[arg(
        long = "format",
        alias = "output",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format"
    )]
    pub(crate) format: OutputFormat,
    #[arg(
        long,
        global = true,
        env = ENV_LOG_LEVEL,
        default_value = DEFAULT_LOG_LEVEL,
        help = "Log filter directive; RUST_LOG takes precedence"
    )]
    pub(crate) log_level: String,
    #[arg(long, global = true, value_enum)]
    pub(crate) log_format: Option<LogFormatArg>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Connection settings; each flag falls back to its environment variable.
#[derive(Args)]
pub(crate) struct ConnectionArgs {
    #[arg(long, global = true, env = ENV_BASE_URL, help = "Recommender API base URL")]
    pub(crate) base_url: Option<String>,
    #[arg(
        long,
        global = true,
        env = ENV_PROJECT_ID,
        help = "Project billed for requests made with ambient credentials"
    )]
    pub(crate) project_id: Option<String>,
    #[arg(
        long,
        global = true,
        env = ENV_API_KEY,
        hide_env_values = true,
        help = "API key; takes precedence over ambient credentials"
    )]
    pub(crate) api_key: Option<String>,
    #[arg(
        long,
        global = true,
        env = ENV_ACCESS_TOKEN,
        hide_env_values = true,
        help = "Bearer token to use instead of application-default discovery"
    )]
    pub(crate) access_token: Option<String>,
}

impl ConnectionArgs {
    pub(crate) fn into_sources(self) -> ConfigSources {
        ConfigSources {
            base_url: self.base_url,
            project_id: self.project_id,
            api_key: self.api_key,
            access_token: self.access_token,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Command {
    #[command(subcommand)]
    Container(ContainerCommand),
}

#[derive(Subcommand)]
pub(crate) enum ContainerCommand {
    #[command(subcommand)]
    Ai(AiCommand),
}

#[derive(Subcommand)]
pub(crate) enum AiCommand {
    #[command(subcommand)]
    Recommender(RecommenderCommand),
}

#[derive(Subcommand)]
pub(crate) enum RecommenderCommand {
    /// Manage models
    #[command(subcommand)]
    Models(ModelsCommand),
    /// Manage model servers
    #[command(subcommand)]
    ModelServers(ModelServersCommand),
    /// Manage model server versions
    #[command(subcommand)]
    ModelServerVersions(ModelServerVersionsCommand),
    /// Manage accelerators
    #[command(subcommand)]
    Accelerators(AcceleratorsCommand),
    /// Manage manifests
    #[command(subcommand)]
    Manifests(ManifestsCommand),
    /// Manage models and servers
    #[command(subcommand, name = "modelsAndServers")]
    ModelsAndServers(ModelsAndServersCommand),
}

#[derive(Subcommand)]
pub(crate) enum ModelsCommand {
    /// List models
    List,
}

#[derive(Subcommand)]
pub(crate) enum ModelServersCommand {
    /// List model servers
    List(ModelArgs),
}

#[derive(Subcommand)]
pub(crate) enum ModelServerVersionsCommand {
    /// List model server versions
    List(ModelServerArgs),
}

#[derive(Subcommand)]
pub(crate) enum AcceleratorsCommand {
    /// List accelerators
    List(ModelServerArgs),
}

#[derive(Subcommand)]
pub(crate) enum ManifestsCommand {
    /// Create an optimized manifest
    Create(ManifestCreateArgs),
}

#[derive(Subcommand)]
pub(crate) enum ModelsAndServersCommand {
    /// List models and servers
    List,
}

#[derive(Args)]
pub(crate) struct ModelArgs {
    #[arg(long, help = "Model name")]
    pub(crate) model: String,
}

#[derive(Args)]
pub(crate) struct ModelServerArgs {
    #[arg(long, help = "Model name")]
    pub(crate) model: String,
    #[arg(long, help = "Model server name")]
    pub(crate) model_server: String,
}

#[derive(Args)]
pub(crate) struct ManifestCreateArgs {
    #[arg(long, help = "Model name")]
    pub(crate) model: String,
    #[arg(long, help = "Model server name")]
    pub(crate) model_server: String,
    #[arg(long, help = "Model server version")]
    pub(crate) model_server_version: String,
    #[arg(long, help = "Accelerator type")]
    pub(crate) accelerator_type: String,
    #[arg(
        long,
        default_value_t = 0,
        allow_negative_numbers = true,
        help = "Target normalized time per output token; 0 leaves it to the service"
    )]
    pub(crate) target_ntpot_milliseconds: i64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

const fn command_label(command: &Command) -> &'static str {
    let Command::Container(ContainerCommand::Ai(AiCommand::Recommender(command))) = command;
    match command {
        RecommenderCommand::Models(_) => "models_list",
        RecommenderCommand::ModelServers(_) => "model_servers_list",
        RecommenderCommand::ModelServerVersions(_) => "model_server_versions_list",
        RecommenderCommand::Accelerators(_) => "accelerators_list",
        RecommenderCommand::Manifests(_) => "manifests_create",
        RecommenderCommand::ModelsAndServers(_) => "models_and_servers_list",
    }
}
