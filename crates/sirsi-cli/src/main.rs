// crates/sirsi-cli/src/main.rs
//
// CLI entrypoint for the Sirsi admin control plane.
//
// Provides subcommands for the system overview, global settings, tenants,
// estates, and notifications, all spoken over the daemon's JSON RPC surface.

mod commands;
mod output;
mod rpc_client;

use clap::{Parser, Subcommand};
use commands::estates::EstatesCmd;
use commands::notify::NotifyCmd;
use commands::overview::OverviewCmd;
use commands::settings::SettingsCmd;
use commands::tenants::TenantsCmd;
use commands::Context;

/// Sirsi CLI: operator tools for the admin control plane.
#[derive(Parser, Debug)]
#[command(
    name = "sirsi",
    version = "0.1.0",
    about = "Sirsi admin CLI: tenants, estates, settings and notifications"
)]
struct Cli {
    /// Base URL of the sirsi-daemon.
    #[arg(long, global = true, default_value = "http://127.0.0.1:8080")]
    url: String,

    /// Print raw JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Dashboard snapshot: counts, settings, revenue and recent activity.
    Overview(OverviewCmd),

    /// Global settings: get, set.
    #[command(subcommand)]
    Settings(SettingsCmd),

    /// Tenant management: list, create, deactivate.
    #[command(subcommand)]
    Tenants(TenantsCmd),

    /// Estate management: list, create.
    #[command(subcommand)]
    Estates(EstatesCmd),

    /// Notifications: send, list.
    #[command(subcommand)]
    Notify(NotifyCmd),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let ctx = Context::new(&cli.url, cli.json);

    match &cli.command {
        Commands::Overview(cmd) => commands::overview::run(&ctx, cmd).await?,
        Commands::Settings(cmd) => commands::settings::run(&ctx, cmd).await?,
        Commands::Tenants(cmd) => commands::tenants::run(&ctx, cmd).await?,
        Commands::Estates(cmd) => commands::estates::run(&ctx, cmd).await?,
        Commands::Notify(cmd) => commands::notify::run(&ctx, cmd).await?,
    }

    Ok(())
}
