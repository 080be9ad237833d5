//! loadgate service entry point.
//!
//! # Architecture Overview
//!
//! ```text
//!   .env missing? ──▶ bootstrap prompts ──▶ .env written
//!                                              │
//!   process env ◀── settings file (no override)┘
//!        │
//!        ▼
//!   loader ──▶ validator ──▶ ConfigManager (ArcSwap snapshot)
//!                                  │
//!              ┌───────────────────┼────────────────────┐
//!              ▼                   ▼                    ▼
//!          logging            HTTP listener         SIGHUP reload
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use loadgate::config::{AppConfig, ConfigManager, DEFAULT_SETTINGS_PATH};
use loadgate::http::HttpServer;
use loadgate::lifecycle::{startup, Shutdown, SignalEvent, Signals};
use loadgate::observability::{init_logging, SilentMode};

#[derive(Parser)]
#[command(name = "loadgate")]
#[command(about = "Environment-configured service with first-run setup", long_about = None)]
struct Cli {
    /// Settings file to load, created interactively if missing.
    #[arg(long, default_value = DEFAULT_SETTINGS_PATH)]
    env_file: PathBuf,

    /// Send logs only to the log file (or nowhere if file logging is off).
    #[arg(long)]
    silent: bool,

    /// Validate the configuration, print it, and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let silent = SilentMode::new(cli.silent);

    let loader_silent = silent.clone();
    let env_file = cli.env_file.clone();
    let loaded = tokio::task::spawn_blocking(move || {
        startup::load_configuration(&env_file, &loader_silent)
    })
    .await?;
    let manager = match loaded {
        Ok(manager) => Arc::new(manager),
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let _logging = init_logging(&manager.log_config(), &silent)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "loadgate starting");
    manager.log_summary();

    if cli.check {
        let mut config = AppConfig::clone(&manager.snapshot());
        config.auth.key = "<redacted>".to_string();
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let server_config = manager.effective_server_config();
    let listener = TcpListener::bind(server_config.bind_address()).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(manager.clone());
    let server_task = tokio::spawn(server.run(listener, shutdown.signal()));

    println!("{}", startup::startup_banner(&server_config));
    println!("Press Ctrl+C to stop the service");

    let mut signals = Signals::install()?;
    loop {
        match signals.recv().await {
            SignalEvent::Reload => reload(&manager).await,
            SignalEvent::Shutdown => break,
        }
    }

    tracing::info!("Shutdown signal received");
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Reload on SIGHUP. Listener settings only take effect after a restart.
async fn reload(manager: &Arc<ConfigManager>) {
    let before = manager.effective_server_config();
    let target = manager.clone();

    match tokio::task::spawn_blocking(move || target.reload_config()).await {
        Ok(Ok(())) => {
            if manager.effective_server_config().bind_address() != before.bind_address() {
                tracing::warn!(
                    current = %before.bind_address(),
                    "Listen address changed; restart to apply"
                );
            }
            manager.log_summary();
        }
        Ok(Err(e)) => tracing::error!(error = %e, "Reload failed, keeping current configuration"),
        Err(e) => tracing::error!(error = %e, "Reload task failed"),
    }
}
