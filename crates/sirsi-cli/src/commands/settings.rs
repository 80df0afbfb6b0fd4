// crates/sirsi-cli/src/commands/settings.rs
//
// `sirsi settings {get, set}`: read and patch the global settings document.

use clap::Subcommand;

use sirsi_core::settings::{Settings, SettingsPatch};
use sirsi_facade::messages::{GetSettingsResponse, UpdateSettingsRequest, UpdateSettingsResponse};
use sirsi_rpc::handlers::ADMIN_SERVICE_V2;
use sirsi_rpc::router::Empty;

use super::Context;
use crate::output::{format_json, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum SettingsCmd {
    /// Show the current settings and their version.
    Get,
    /// Change one or more settings. Unnamed fields are left as they are.
    Set {
        #[arg(long)]
        maintenance_mode: Option<bool>,
        #[arg(long)]
        active_region: Option<String>,
        #[arg(long)]
        sirsi_multiplier: Option<f64>,
        /// Only apply if the stored settings still have this version.
        #[arg(long)]
        expected_version: Option<String>,
    },
}

/// Run the settings subcommand.
pub async fn run(ctx: &Context, cmd: &SettingsCmd) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        SettingsCmd::Get => {
            let resp: GetSettingsResponse =
                ctx.client.call(ADMIN_SERVICE_V2, "GetSettings", &Empty {}).await?;
            match ctx.format {
                OutputFormat::Json => println!("{}", format_json(&resp)),
                OutputFormat::Table => print_settings(&resp.settings, &resp.version),
            }
        }
        SettingsCmd::Set {
            maintenance_mode,
            active_region,
            sirsi_multiplier,
            expected_version,
        } => {
            let patch = SettingsPatch {
                maintenance_mode: *maintenance_mode,
                active_region: active_region.clone(),
                sirsi_multiplier: *sirsi_multiplier,
            };
            if patch.is_empty() {
                return Err("nothing to change: pass at least one of --maintenance-mode, --active-region, --sirsi-multiplier".into());
            }
            let req = UpdateSettingsRequest {
                settings: patch,
                expected_version: expected_version.clone(),
            };
            let resp: UpdateSettingsResponse =
                ctx.client.call(ADMIN_SERVICE_V2, "UpdateSettings", &req).await?;
            match ctx.format {
                OutputFormat::Json => println!("{}", format_json(&resp)),
                OutputFormat::Table => {
                    println!("Settings updated.");
                    println!();
                    print_settings(&resp.settings, &resp.version);
                }
            }
        }
    }

    Ok(())
}

fn print_settings(settings: &Settings, version: &str) {
    println!("  Maintenance mode: {}", settings.maintenance_mode);
    println!("  Active region:    {}", settings.active_region);
    println!("  Sirsi multiplier: {}", settings.sirsi_multiplier);
    println!("  Version:          {}", version);
}
