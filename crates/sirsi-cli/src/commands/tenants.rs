// crates/sirsi-cli/src/commands/tenants.rs
//
// `sirsi tenants {list, create, deactivate}`: tenant lifecycle.

use clap::{Subcommand, ValueEnum};
use uuid::Uuid;

use sirsi_core::pagination::PageRequest;
use sirsi_core::tenant::{Tenant, TenantDraft, TenantFilter, TenantStatus};
use sirsi_facade::messages::{
    CreateTenantRequest, DeactivateTenantRequest, DeactivateTenantResponse, ListTenantsRequest,
    ListTenantsResponse,
};
use sirsi_rpc::handlers::TENANT_SERVICE;

use super::Context;
use crate::output::{format_json, format_page, format_table, OutputFormat, TenantRow};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Active,
    Suspended,
    Deactivated,
}

impl From<StatusArg> for TenantStatus {
    fn from(s: StatusArg) -> Self {
        match s {
            StatusArg::Active => TenantStatus::Active,
            StatusArg::Suspended => TenantStatus::Suspended,
            StatusArg::Deactivated => TenantStatus::Deactivated,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum TenantsCmd {
    /// List tenants, optionally filtered by status.
    List {
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        page_token: Option<String>,
    },
    /// Register a new tenant.
    Create {
        #[arg(long)]
        name: String,
        /// Lowercase letters, digits and '-', unique across tenants.
        #[arg(long)]
        slug: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Deactivate a tenant. Deactivating twice is harmless.
    Deactivate {
        #[arg(long)]
        id: Uuid,
    },
}

/// Run the tenants subcommand.
pub async fn run(ctx: &Context, cmd: &TenantsCmd) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        TenantsCmd::List {
            status,
            page_size,
            page_token,
        } => {
            let req = ListTenantsRequest {
                filter: TenantFilter {
                    status: status.map(TenantStatus::from),
                },
                pagination: PageRequest {
                    page_token: page_token.clone(),
                    page_size: *page_size,
                },
            };
            let resp: ListTenantsResponse =
                ctx.client.call(TENANT_SERVICE, "ListTenants", &req).await?;
            match ctx.format {
                OutputFormat::Json => println!("{}", format_json(&resp)),
                OutputFormat::Table => {
                    let rows: Vec<TenantRow> = resp.tenants.iter().map(TenantRow::from).collect();
                    println!(
                        "{}",
                        format_page(&rows, resp.pagination.total_count, resp.next_page_token.as_deref())
                    );
                }
            }
        }
        TenantsCmd::Create {
            name,
            slug,
            description,
        } => {
            let req = CreateTenantRequest {
                tenant: TenantDraft {
                    name: name.clone(),
                    slug: slug.clone(),
                    description: description.clone(),
                },
            };
            let tenant: Tenant = ctx.client.call(TENANT_SERVICE, "CreateTenant", &req).await?;
            print_tenant(ctx.format, "Tenant created.", &tenant);
        }
        TenantsCmd::Deactivate { id } => {
            let req = DeactivateTenantRequest { id: *id };
            let resp: DeactivateTenantResponse =
                ctx.client.call(TENANT_SERVICE, "DeactivateTenant", &req).await?;
            print_tenant(ctx.format, "Tenant deactivated.", &resp.tenant);
        }
    }

    Ok(())
}

fn print_tenant(format: OutputFormat, headline: &str, tenant: &Tenant) {
    match format {
        OutputFormat::Json => println!("{}", format_json(tenant)),
        OutputFormat::Table => {
            println!("{}", headline);
            println!("{}", format_table(&[TenantRow::from(tenant)]));
        }
    }
}
