// crates/sirsi-cli/src/commands/estates.rs
//
// `sirsi estates {list, create}`: estate registry.

use clap::Subcommand;

use sirsi_core::estate::{Estate, EstateDraft, EstateFilter};
use sirsi_core::pagination::PageRequest;
use sirsi_facade::messages::{CreateEstateRequest, ListEstatesRequest, ListEstatesResponse};
use sirsi_rpc::handlers::ADMIN_SERVICE_V2;

use super::Context;
use crate::output::{format_json, format_page, format_table, EstateRow, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum EstatesCmd {
    /// List estates, optionally for one owner.
    List {
        #[arg(long)]
        owner_email: Option<String>,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        page_token: Option<String>,
    },
    /// Register a new estate in the Planning phase.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        owner_email: String,
    },
}

/// Run the estates subcommand.
pub async fn run(ctx: &Context, cmd: &EstatesCmd) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        EstatesCmd::List {
            owner_email,
            page_size,
            page_token,
        } => {
            let req = ListEstatesRequest {
                filter: EstateFilter {
                    owner_email: owner_email.clone(),
                    ..EstateFilter::default()
                },
                pagination: PageRequest {
                    page_token: page_token.clone(),
                    page_size: *page_size,
                },
            };
            let resp: ListEstatesResponse =
                ctx.client.call(ADMIN_SERVICE_V2, "ListEstates", &req).await?;
            match ctx.format {
                OutputFormat::Json => println!("{}", format_json(&resp)),
                OutputFormat::Table => {
                    let rows: Vec<EstateRow> = resp.estates.iter().map(EstateRow::from).collect();
                    println!(
                        "{}",
                        format_page(&rows, resp.pagination.total_count, resp.next_page_token.as_deref())
                    );
                }
            }
        }
        EstatesCmd::Create { name, owner_email } => {
            let req = CreateEstateRequest {
                estate: EstateDraft {
                    name: name.clone(),
                    owner_email: owner_email.clone(),
                    phase: None,
                },
            };
            let estate: Estate = ctx.client.call(ADMIN_SERVICE_V2, "CreateEstate", &req).await?;
            match ctx.format {
                OutputFormat::Json => println!("{}", format_json(&estate)),
                OutputFormat::Table => {
                    println!("Estate created.");
                    println!("{}", format_table(&[EstateRow::from(&estate)]));
                }
            }
        }
    }

    Ok(())
}
