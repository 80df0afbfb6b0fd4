// crates/sirsi-cli/src/commands/mod.rs
//
// Command module declarations for the Sirsi CLI, plus the context every
// command runs with.

pub mod estates;
pub mod notify;
pub mod overview;
pub mod settings;
pub mod tenants;

use crate::output::OutputFormat;
use crate::rpc_client::RpcClient;

/// Shared state handed to each subcommand.
pub struct Context {
    pub client: RpcClient,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(url: &str, json: bool) -> Self {
        Self {
            client: RpcClient::new(url),
            format: if json { OutputFormat::Json } else { OutputFormat::Table },
        }
    }
}
