// crates/sirsi-cli/src/commands/notify.rs
//
// `sirsi notify {send, list}`: queue notifications and inspect the outbox.

use clap::Subcommand;

use sirsi_core::notification::NotificationDraft;
use sirsi_core::pagination::PageRequest;
use sirsi_facade::messages::{
    ListNotificationsRequest, ListNotificationsResponse, SendNotificationResponse,
};
use sirsi_rpc::handlers::NOTIFICATION_SERVICE;

use super::Context;
use crate::output::{format_json, format_page, NotificationRow, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum NotifyCmd {
    /// Queue a notification for delivery.
    Send {
        /// Recipient id, or "all" to broadcast.
        #[arg(long, default_value = "all")]
        to: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
        /// Free-form kind, e.g. info, warning, alert.
        #[arg(long = "type", default_value = "info")]
        kind: String,
    },
    /// List notifications with their delivery status.
    List {
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        page_token: Option<String>,
    },
}

/// Run the notify subcommand.
pub async fn run(ctx: &Context, cmd: &NotifyCmd) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        NotifyCmd::Send {
            to,
            title,
            body,
            kind,
        } => {
            let draft = NotificationDraft {
                recipient_id: to.clone(),
                title: title.clone(),
                body: body.clone(),
                kind: kind.clone(),
            };
            let resp: SendNotificationResponse = ctx
                .client
                .call(NOTIFICATION_SERVICE, "SendNotification", &draft)
                .await?;
            match ctx.format {
                OutputFormat::Json => println!("{}", format_json(&resp)),
                OutputFormat::Table => {
                    println!("Notification {} ({})", resp.notification_id, resp.status)
                }
            }
        }
        NotifyCmd::List {
            page_size,
            page_token,
        } => {
            let req = ListNotificationsRequest {
                pagination: PageRequest {
                    page_token: page_token.clone(),
                    page_size: *page_size,
                },
            };
            let resp: ListNotificationsResponse = ctx
                .client
                .call(NOTIFICATION_SERVICE, "ListNotifications", &req)
                .await?;
            match ctx.format {
                OutputFormat::Json => println!("{}", format_json(&resp)),
                OutputFormat::Table => {
                    let rows: Vec<NotificationRow> =
                        resp.notifications.iter().map(NotificationRow::from).collect();
                    println!(
                        "{}",
                        format_page(&rows, resp.pagination.total_count, resp.next_page_token.as_deref())
                    );
                }
            }
        }
    }

    Ok(())
}
