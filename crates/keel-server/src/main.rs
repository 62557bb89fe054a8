//! Keel - multi-project metadata store with a JSON API.

use anyhow::Result;
use axum::Router;
use clap::{Parser, Subcommand};
use keel_core::ProjectStore;
use keel_server::{commands, config, logging, routes, state};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use commands::StoreCommand;
use config::Config;
use logging::{LogConfig, LogFormat};
use state::AppState;

/// Keel - track projects, their decisions and objectives.
#[derive(Parser, Debug)]
#[command(name = "keel")]
#[command(about = "Multi-project metadata store for coding agents")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Override the projects directory from config
    #[arg(long, value_name = "DIR", global = true)]
    projects_dir: Option<PathBuf>,

    /// Enable verbose logging (INFO level for all keel targets)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable trace logging (TRACE level for everything)
    #[arg(long, global = true)]
    trace: bool,

    /// Quiet mode (WARN and ERROR only)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Set log level for specific targets (e.g., "load=debug" or "store=trace").
    /// Can be specified multiple times. Targets are prefixed with "keel::" automatically.
    #[arg(long = "log", value_name = "TARGET=LEVEL", global = true)]
    log_overrides: Vec<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API (the default)
    Serve {
        /// Override port from config
        #[arg(short, long)]
        port: Option<u16>,
    },
    #[command(flatten)]
    Store(StoreCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_cli(
        cli.verbose,
        cli.debug,
        cli.trace,
        cli.quiet,
        cli.log_overrides,
        cli.log_format,
    );
    logging::init(&log_config);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = cli.projects_dir {
        config.projects_dir = dir;
    }

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await
        }
        Command::Store(command) => {
            let mut store = ProjectStore::open(&config.projects_dir)?;
            let output = commands::run(command, &mut store)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    tracing::info!(
        target: "keel::startup",
        "Loaded configuration (port: {}, projects: {:?})",
        config.port,
        config.projects_dir
    );

    let state = Arc::new(AppState::new(&config)?);
    tracing::info!(target: "keel::startup", "Initialized project store");

    let app = Router::new()
        .nest("/api", routes::api_router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!(target: "keel::startup", "Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
