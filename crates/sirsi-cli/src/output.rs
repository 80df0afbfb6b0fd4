// crates/sirsi-cli/src/output.rs
//
// Output formatting utilities for the Sirsi CLI.
// Supports table and JSON output modes.

use serde::Serialize;
use tabled::{Table, Tabled};

use sirsi_core::audit::AuditLogEntry;
use sirsi_core::contract::Money;
use sirsi_core::estate::Estate;
use sirsi_core::notification::Notification;
use sirsi_core::tenant::Tenant;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    Table,
    /// JSON output for machine consumption.
    Json,
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}

/// "$42,500.00 USD" style rendering of minor units.
pub fn format_money(money: &Money) -> String {
    let sign = if money.amount_cents < 0 { "-" } else { "" };
    let cents = money.amount_cents.unsigned_abs();
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{:02} {}", sign, grouped, cents % 100, money.currency)
}

#[derive(Debug, Tabled)]
pub struct TenantRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Slug")]
    pub slug: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Created")]
    pub created: String,
}

impl From<&Tenant> for TenantRow {
    fn from(t: &Tenant) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name.clone(),
            slug: t.slug.clone(),
            status: format!("{:?}", t.status),
            created: t.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Tabled)]
pub struct EstateRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Owner")]
    pub owner: String,
    #[tabled(rename = "Phase")]
    pub phase: String,
}

impl From<&Estate> for EstateRow {
    fn from(e: &Estate) -> Self {
        Self {
            id: e.id.to_string(),
            name: e.name.clone(),
            owner: e.owner_email.clone(),
            phase: format!("{:?}", e.phase),
        }
    }
}

#[derive(Debug, Tabled)]
pub struct NotificationRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Recipient")]
    pub recipient: String,
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl From<&Notification> for NotificationRow {
    fn from(n: &Notification) -> Self {
        let status = match &n.failure_reason {
            Some(reason) => format!("{} ({})", n.status, reason),
            None => n.status.to_string(),
        };
        Self {
            id: n.id.to_string(),
            recipient: n.recipient_id.clone(),
            kind: n.kind.clone(),
            title: n.title.clone(),
            status,
        }
    }
}

#[derive(Debug, Tabled)]
pub struct ActivityRow {
    #[tabled(rename = "Time")]
    pub time: String,
    #[tabled(rename = "Level")]
    pub level: String,
    #[tabled(rename = "Source")]
    pub source: String,
    #[tabled(rename = "Message")]
    pub message: String,
}

impl From<&AuditLogEntry> for ActivityRow {
    fn from(e: &AuditLogEntry) -> Self {
        Self {
            time: e.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            level: format!("{:?}", e.level).to_uppercase(),
            source: e.source.clone(),
            message: e.message.clone(),
        }
    }
}

/// Table for a page of items plus the continuation hint.
pub fn format_page<T: Tabled>(rows: &[T], total: u64, next_page_token: Option<&str>) -> String {
    let mut out = if rows.is_empty() {
        "No results.".to_string()
    } else {
        format_table(rows)
    };
    out.push_str(&format!("\n{} of {} shown", rows.len(), total));
    if let Some(token) = next_page_token {
        out.push_str(&format!(" (next page: --page-token {})", token));
    }
    out
}
