//! DEEPBIT - Drill AI Intelligence Platform
//!
//! Serves the drilling dashboard and forwards uploads to the processing
//! service.
//!
//! # Usage
//!
//! ```bash
//! # Serve the dashboard on the configured address
//! cargo run --release
//!
//! # Point at a different processing service
//! DEEPBIT_UPLOAD_URL=http://processor:9000 ./deepbit serve
//!
//! # Normalize a saved processing-service reply offline
//! ./deepbit normalize reply.json
//! ```
//!
//! # Environment Variables
//!
//! - `DEEPBIT_CONFIG`: Path to the TOML config file
//! - `DEEPBIT_SERVER_ADDR`: Bind address override
//! - `DEEPBIT_UPLOAD_URL`: Processing service base URL override
//! - `DEEPBIT_CORS_ORIGINS`: Comma-separated allowed origins
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use deepbit::api::{create_app, DashboardState};
use deepbit::config::{self, DashboardConfig};
use deepbit::types::Well;
use deepbit::upload::{normalize_records, rows_from_json, RawRecord};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "deepbit")]
#[command(about = "DEEPBIT Drill AI Intelligence Platform")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file (overrides DEEPBIT_CONFIG and ./deepbit.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Serve the dashboard (default)
    Serve {
        /// Override the server address (e.g. "127.0.0.1:8080")
        #[arg(short, long)]
        addr: Option<String>,
    },

    /// Normalize a saved processing-service reply and print the records as JSON
    Normalize {
        /// JSON file: either `{ "processedData": [...] }` or a bare array of rows
        input: PathBuf,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the well catalog
    Wells,

    /// Validate the configuration and print the effective values as TOML
    CheckConfig,
}

// ============================================================================
// Startup
// ============================================================================

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    // stderr keeps `normalize` output on stdout clean
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    match path {
        Some(p) => {
            let mut config = DashboardConfig::load_from_file(p)
                .with_context(|| format!("Failed to load config from {}", p.display()))?;
            config.apply_env_overrides(|key| std::env::var(key).ok());
            info!(path = %p.display(), "Loaded config from --config");
            Ok(config)
        }
        None => DashboardConfig::load().context("Failed to load configuration"),
    }
}

#[derive(Debug, Clone, Copy)]
enum TaskName {
    HttpServer,
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpServer => write!(f, "HttpServer"),
        }
    }
}

/// Spawn the HTTP server task into the JoinSet.
fn spawn_http_server(
    task_set: &mut JoinSet<Result<TaskName>>,
    listener: tokio::net::TcpListener,
    app: axum::Router,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        info!("[HttpServer] Task starting");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                info!("[HttpServer] Received shutdown signal");
            })
            .await
            .context("HTTP server error")?;

        info!("[HttpServer] Graceful shutdown complete");
        Ok(TaskName::HttpServer)
    });
}

async fn serve(config: &DashboardConfig, addr_override: Option<String>) -> Result<()> {
    let addr = addr_override.unwrap_or_else(|| config.server.addr.clone());

    let service = deepbit::build_service(config).context("Failed to build upload client")?;
    info!(
        wells = config.wells.len(),
        upload_service = %config.upload.base_url,
        "Dashboard service initialized"
    );

    let app = create_app(DashboardState::new(service), &config.server);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!("Dashboard available at: http://{}/dashboard", addr);

    let cancel_token = CancellationToken::new();
    let mut task_set = JoinSet::new();
    spawn_http_server(&mut task_set, listener, app, cancel_token.clone());

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
            cancel_token.cancel();
        }
        Some(result) = task_set.join_next() => {
            cancel_token.cancel();
            match result {
                Ok(Ok(task)) => info!("[{}] exited", task),
                Ok(Err(e)) => {
                    error!("Task failed: {:#}", e);
                    return Err(e);
                }
                Err(e) => return Err(anyhow::anyhow!("Task panicked: {e}")),
            }
        }
    }

    while let Some(result) = task_set.join_next().await {
        match result {
            Ok(Ok(task)) => info!("[{}] stopped", task),
            Ok(Err(e)) => error!("Task failed during shutdown: {:#}", e),
            Err(e) => error!("Task panicked during shutdown: {}", e),
        }
    }
    Ok(())
}

fn read_rows(path: &Path) -> Result<Vec<RawRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    rows_from_json(&text).with_context(|| format!("Cannot normalize {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let config = load_config(args.config.as_deref())?;
    config.validate().context("Invalid configuration")?;
    config::init(config.clone());

    match args.command.unwrap_or(SubCommand::Serve { addr: None }) {
        SubCommand::Serve { addr } => serve(config::get(), addr).await,
        SubCommand::Normalize { input, pretty } => {
            let records = normalize_records(&read_rows(&input)?);
            info!(rows = records.len(), "Normalized {}", input.display());
            let out = if pretty {
                serde_json::to_string_pretty(&records)?
            } else {
                serde_json::to_string(&records)?
            };
            println!("{out}");
            Ok(())
        }
        SubCommand::Wells => {
            for well in Well::catalog(&config.wells) {
                println!("{:<8} {:<24} {}", well.id, well.name, well.depth_label());
            }
            Ok(())
        }
        SubCommand::CheckConfig => {
            print!("{}", config.to_toml()?);
            info!("Configuration OK");
            Ok(())
        }
    }
}
