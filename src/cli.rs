//! Command-line interface.
//!
//! Flags and environment variables override values from an optional TOML
//! file, which in turn override built-in defaults. Each flag group maps onto
//! one sub-config and is applied independently.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{
    loader::read_config, validate_config, ApiConfig, ConfigError, GracefulConfig, LoggerConfig,
    ObservabilityConfig, PgConfig, ServerConfig, StoreBackend, ZeroTimeout,
};
use crate::error::AppError;
use crate::lifecycle::{signals, App, Shutdown};
use crate::observability::{init_logging, metrics};

#[derive(Debug, Parser)]
#[command(name = "comment")]
#[command(about = "Comment service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Starts Comment API server
    Api(ApiArgs),
}

#[derive(Debug, Default, Args)]
pub struct ApiArgs {
    /// TOML configuration file.
    #[arg(long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub graceful: GracefulArgs,

    #[command(flatten)]
    pub logger: LoggerArgs,

    #[command(flatten)]
    pub pg: PgArgs,

    #[command(flatten)]
    pub observability: ObservabilityArgs,
}

#[derive(Debug, Default, Args)]
#[command(next_help_heading = "Server")]
pub struct ServerArgs {
    /// RPC listen address, e.g. ":8083" or "127.0.0.1:8083".
    #[arg(long = "grpc-addr", env = "GRPC_ADDR")]
    pub grpc_addr: Option<String>,

    #[arg(long = "request-timeout-secs", env = "REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Args)]
#[command(next_help_heading = "Graceful")]
pub struct GracefulArgs {
    /// Shutdown deadline in milliseconds. 0 waits forever unless fail-fast is set.
    #[arg(long = "graceful-timeout-ms", env = "GRACEFUL_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Meaning of a zero deadline: "wait" or "fail-fast".
    #[arg(long = "graceful-on-zero-timeout", env = "GRACEFUL_ON_ZERO_TIMEOUT")]
    pub on_zero_timeout: Option<ZeroTimeout>,
}

#[derive(Debug, Default, Args)]
#[command(next_help_heading = "Logger")]
pub struct LoggerArgs {
    #[arg(long = "logger-level", env = "LOGGER_LEVEL")]
    pub level: Option<String>,

    /// Pretty output instead of JSON.
    #[arg(long = "logger-development", env = "LOGGER_DEVELOPMENT")]
    pub development: Option<bool>,
}

#[derive(Debug, Default, Args)]
#[command(next_help_heading = "Postgres")]
pub struct PgArgs {
    /// Comment store: "postgres" or "memory".
    #[arg(long = "pg-backend", env = "PG_BACKEND")]
    pub backend: Option<StoreBackend>,

    #[arg(long = "pg-url", env = "PG_URL")]
    pub url: Option<String>,

    #[arg(long = "pg-max-connections", env = "PG_MAX_CONNECTIONS")]
    pub max_connections: Option<u32>,

    #[arg(long = "pg-connect-timeout-secs", env = "PG_CONNECT_TIMEOUT_SECS")]
    pub connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Args)]
#[command(next_help_heading = "Observability")]
pub struct ObservabilityArgs {
    #[arg(long = "metrics-enabled", env = "METRICS_ENABLED")]
    pub metrics_enabled: Option<bool>,

    #[arg(long = "metrics-address", env = "METRICS_ADDRESS")]
    pub metrics_address: Option<String>,
}

impl ServerArgs {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(addr) = self.grpc_addr {
            config.grpc_addr = addr;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout_secs = secs;
        }
    }
}

impl GracefulArgs {
    fn apply(self, config: &mut GracefulConfig) {
        if let Some(ms) = self.timeout_ms {
            config.timeout_ms = ms;
        }
        if let Some(policy) = self.on_zero_timeout {
            config.on_zero_timeout = policy;
        }
    }
}

impl LoggerArgs {
    fn apply(self, config: &mut LoggerConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }
        if let Some(development) = self.development {
            config.development = development;
        }
    }
}

impl PgArgs {
    fn apply(self, config: &mut PgConfig) {
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(url) = self.url {
            config.url = url;
        }
        if let Some(max) = self.max_connections {
            config.max_connections = max;
        }
        if let Some(secs) = self.connect_timeout_secs {
            config.connect_timeout_secs = secs;
        }
    }
}

impl ObservabilityArgs {
    fn apply(self, config: &mut ObservabilityConfig) {
        if let Some(enabled) = self.metrics_enabled {
            config.metrics_enabled = enabled;
        }
        if let Some(addr) = self.metrics_address {
            config.metrics_address = addr;
        }
    }
}

impl ApiArgs {
    /// Resolve defaults, the optional file and overrides into a validated config.
    pub fn into_config(self) -> Result<ApiConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ApiConfig::default(),
        };

        self.server.apply(&mut config.server);
        self.graceful.apply(&mut config.graceful);
        self.logger.apply(&mut config.logger);
        self.pg.apply(&mut config.pg);
        self.observability.apply(&mut config.observability);

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

/// Run the parsed command to completion.
pub async fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Commands::Api(args) => run_api(args).await,
    }
}

async fn run_api(args: ApiArgs) -> Result<(), AppError> {
    let config = args.into_config()?;

    if let Err(e) = init_logging(&config.logger) {
        eprintln!("failed to initialize logger: {}", e);
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::warn!(error = %e, "Metrics exporter unavailable");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let _signals = signals::trigger_on_signal(shutdown.clone());

    let app = App::build(config).await?;
    app.run(shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
