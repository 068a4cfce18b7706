//! Uploads gateway
//!
//! Front server for the ftronlie site, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────────┐
//!                      │                   UPLOADS GATEWAY                     │
//!                      │                                                       │
//!   Client Request     │  ┌─────────┐   ┌──────────────┐                       │
//!   ───────────────────┼─▶│  http   │──▶│   routing    │                       │
//!                      │  │ server  │   │ redirects →  │                       │
//!                      │  └─────────┘   │ rewrites     │                       │
//!                      │                └──────┬───────┘                       │
//!                      │        ┌──────────────┼────────────────┐              │
//!                      │        ▼              ▼                ▼              │
//!                      │  ┌──────────┐  ┌──────────────┐  ┌─────────────┐      │
//!                      │  │ redirect │  │    proxy     │  │ site pages  │      │
//!                      │  │ 307/308  │  │  forwarder   │──┼▶ file host  │      │
//!                      │  └──────────┘  └──────────────┘  │ (upstream)  │      │
//!                      │                                  └─────────────┘      │
//!                      │  ┌──────────────────────────────┐                     │
//!                      │  │ layout: content + footer     │◀── pages / 404      │
//!                      │  └──────────────────────────────┘                     │
//!                      │                                                       │
//!                      │  config (TOML + watcher) · observability · lifecycle  │
//!                      └──────────────────────────────────────────────────────┘
//! ```

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use uploads_gateway::config::{load_config, ConfigWatcher, GatewayConfig};
use uploads_gateway::http::HttpServer;
use uploads_gateway::lifecycle::{wait_for_signal, Shutdown};
use uploads_gateway::observability::{logging, metrics};
use uploads_gateway::routing::Resolution;
use uploads_gateway::site::Site;

#[derive(Parser)]
#[command(name = "uploads-gateway", version)]
#[command(about = "Site front server with transparent uploads rewrites", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Show how a request path would be dispatched
    Resolve {
        /// Request path, optionally with a query string
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, cli.config).await,
        Command::Resolve { path } => resolve(&config, &path),
    }
}

async fn serve(config: GatewayConfig, config_path: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    logging::init_tracing(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "uploads-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        rewrites = config.rewrites.len(),
        redirects = config.redirects.len(),
        pages = config.pages.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // The watcher handle must outlive the server.
    let (config_updates, _watcher) = match &config_path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn resolve(config: &GatewayConfig, target: &str) -> Result<(), Box<dyn Error>> {
    let site = Site::compile(config)?;
    let report = dispatch_report(&site, target);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// What the gateway would do with `target`, a path with an optional query.
fn dispatch_report(site: &Site, target: &str) -> serde_json::Value {
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    };

    let resolution = site.router().resolve(path, query);
    let (dispatch, page) = match &resolution {
        Resolution::Redirect { .. } => ("redirect", None),
        Resolution::Proxy { .. } => ("proxy", None),
        Resolution::Internal { path } => match site.pages().get(path) {
            Some(page) => ("internal", Some(page)),
            None => ("not_found", None),
        },
        Resolution::Passthrough => match site.pages().get(path) {
            Some(page) => ("page", Some(page)),
            None => ("not_found", None),
        },
    };

    serde_json::json!({
        "path": target,
        "dispatch": dispatch,
        "resolution": resolution,
        "page": page.map(|p| p.title.as_str()),
    })
}
