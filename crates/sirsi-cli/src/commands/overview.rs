// crates/sirsi-cli/src/commands/overview.rs
//
// `sirsi overview`: dashboard snapshot from GetSystemOverview.

use clap::Args;

use sirsi_facade::messages::SystemOverview;
use sirsi_rpc::handlers::{ADMIN_SERVICE_V1, ADMIN_SERVICE_V2};
use sirsi_rpc::router::Empty;

use super::Context;
use crate::output::{format_json, format_money, format_table, ActivityRow, OutputFormat};

#[derive(Debug, Args)]
pub struct OverviewCmd {
    /// Ask the v1 AdminService (no revenue or activity feed).
    #[arg(long)]
    pub v1: bool,
}

/// Run the overview command.
pub async fn run(ctx: &Context, cmd: &OverviewCmd) -> Result<(), Box<dyn std::error::Error>> {
    let service = if cmd.v1 { ADMIN_SERVICE_V1 } else { ADMIN_SERVICE_V2 };
    let overview: SystemOverview = ctx.client.call(service, "GetSystemOverview", &Empty {}).await?;

    if ctx.format == OutputFormat::Json {
        println!("{}", format_json(&overview));
        return Ok(());
    }

    println!("System Overview");
    println!("---------------");
    println!("  Tenants:          {}", overview.total_tenants);
    println!("  Contracts:        {}", overview.total_contracts);
    println!("  Sirsi multiplier: {}", overview.sirsi_multiplier);
    println!(
        "  Maintenance:      {}",
        if overview.maintenance_mode { "ON" } else { "off" }
    );
    println!("  Active region:    {}", overview.active_region);
    if let Some(revenue) = &overview.revenue_mtd {
        println!("  Revenue (MTD):    {}", format_money(revenue));
    }

    if let Some(feed) = &overview.activity_feed {
        println!();
        println!("Recent activity");
        if feed.is_empty() {
            println!("  (none)");
        } else {
            let rows: Vec<ActivityRow> = feed.iter().map(ActivityRow::from).collect();
            println!("{}", format_table(&rows));
        }
    }

    Ok(())
}
