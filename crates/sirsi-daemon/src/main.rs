// crates/sirsi-daemon/src/main.rs
//
// Binary entrypoint for the Sirsi admin control-plane daemon.
//
// Parses CLI arguments, loads configuration, initializes tracing, opens the
// settings document and in-memory registries, spawns the notification
// dispatcher, and serves the RPC surface until Ctrl-C.

mod config;
mod dispatcher;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use config::DaemonConfig;
use dispatcher::LogChannel;

use sirsi_core::estate::Estate;
use sirsi_core::tenant::Tenant;
use sirsi_core::user::User;
use sirsi_facade::{Backends, ControlPlane};
use sirsi_rpc::SirsiRpcServer;
use sirsi_store::{
    FileSettingsStore, MemoryAuditLog, MemoryContractLedger, MemoryOutbox, MemoryRegistry,
};

/// Sirsi admin daemon: serves the multi-tenant admin control plane.
#[derive(Parser, Debug)]
#[command(name = "sirsi-daemon", version = "0.1.0", about = "Sirsi admin control-plane daemon")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "sirsi.toml")]
    config: String,

    /// Listen port. Overrides both the config file and `PORT`.
    #[arg(long)]
    port: Option<u16>,

    /// Path of the settings document. Overrides the config file.
    #[arg(long)]
    settings: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration from TOML file, falling back to defaults if the file
    // is not found. The outcome is logged once tracing is up.
    let config_path = expand_tilde(&args.config);
    let loaded = DaemonConfig::load(&config_path);
    let base = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => DaemonConfig::default(),
    };

    // Precedence: defaults < TOML < PORT < --port.
    let mut daemon_config = base.with_port_env(std::env::var("PORT").ok().as_deref())?;
    if let Some(port) = args.port {
        daemon_config.port = port;
    }
    if let Some(settings) = args.settings {
        daemon_config.settings_path = settings;
    }

    // Initialize tracing subscriber for structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&daemon_config.log_level)),
        )
        .init();

    match &loaded {
        Ok(_) => tracing::info!("Loaded configuration from {}", config_path),
        Err(e) => tracing::warn!(
            "Could not load config from {}: {}. Using defaults.",
            config_path,
            e
        ),
    }

    tracing::info!("Sirsi Admin Daemon v0.1.0");
    tracing::info!(
        "RPC endpoint: {}:{}",
        daemon_config.host,
        daemon_config.port
    );

    // ---------------------------------------------------------------
    // Storage
    // ---------------------------------------------------------------
    let settings_path = expand_tilde(&daemon_config.settings_path);
    let settings = FileSettingsStore::open(&settings_path).await?;
    tracing::info!("Settings document: {}", settings_path);

    let outbox = Arc::new(MemoryOutbox::new());
    let backends = Backends {
        settings: Arc::new(settings),
        estates: Arc::new(MemoryRegistry::<Estate>::new()),
        tenants: Arc::new(MemoryRegistry::<Tenant>::new()),
        users: Arc::new(MemoryRegistry::<User>::new()),
        notifications: outbox.clone(),
        audit: Arc::new(MemoryAuditLog::new()),
        contracts: Arc::new(MemoryContractLedger::new()),
    };
    let plane =
        ControlPlane::new(backends).with_activity_feed_len(daemon_config.activity_feed_len);

    // ---------------------------------------------------------------
    // Background work
    // ---------------------------------------------------------------
    let dispatch = tokio::spawn(dispatcher::run_dispatch_loop(
        plane.notifications(),
        Arc::new(LogChannel),
        Duration::from_millis(daemon_config.dispatch_interval_ms.max(1)),
        daemon_config.dispatch_batch,
    ));

    // ---------------------------------------------------------------
    // RPC
    // ---------------------------------------------------------------
    let rpc_server = SirsiRpcServer::new(daemon_config.rpc_config(), plane);
    let served = rpc_server.serve_with_shutdown(shutdown_signal()).await;

    dispatch.abort();
    if let Err(e) = &served {
        tracing::error!("RPC server error: {}", e);
    }
    served?;

    tracing::info!("Sirsi daemon shut down gracefully");
    Ok(())
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
    }
}

/// Expand `~` at the start of a path to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}
