// crates/sirsi-store/src/audit.rs
//
// Append-only in-memory audit trail implementing `AuditLog`.
// Entry n (1-based) has sequence number n; nothing is ever removed.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use sirsi_core::audit::{AuditDraft, AuditLogEntry};
use sirsi_core::error::AdminError;
use sirsi_core::pagination::{paginate, Page, PageRequest};
use sirsi_core::traits::AuditLog;

use crate::poisoned;

#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: RwLock<Vec<AuditLogEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn append(&self, draft: AuditDraft) -> Result<AuditLogEntry, AdminError> {
        let entry = draft.into_entry(Uuid::now_v7(), Utc::now());
        self.entries
            .write()
            .map_err(poisoned)?
            .push(entry.clone());
        Ok(entry)
    }

    async fn list(&self, page: &PageRequest) -> Result<Page<AuditLogEntry>, AdminError> {
        let entries = self.entries.read().map_err(poisoned)?;
        paginate(
            entries
                .iter()
                .enumerate()
                .map(|(i, e)| (i as u64 + 1, e.clone())),
            page,
            entries.len() as u64,
        )
    }

    async fn recent(&self, n: usize) -> Result<Vec<AuditLogEntry>, AdminError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.iter().rev().take(n).cloned().collect())
    }

    async fn count(&self) -> Result<u64, AdminError> {
        Ok(self.entries.read().map_err(poisoned)?.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recent_is_newest_first() {
        let log = MemoryAuditLog::new();
        for i in 0..5 {
            log.append(AuditDraft::info("Test", "system", format!("entry {}", i)))
                .await
                .unwrap();
        }
        let recent = log.recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].message, "entry 4");
        assert_eq!(recent[1].message, "entry 3");
        assert_eq!(log.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_list_pages_in_append_order() {
        let log = MemoryAuditLog::new();
        for i in 0..3 {
            log.append(AuditDraft::info("Test", "system", format!("{}", i)))
                .await
                .unwrap();
        }
        let first = log.list(&PageRequest::first(2)).await.unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.total_count, 3);
        let token = first.next_page_token.unwrap();

        // Appends after a token was issued land on later pages.
        log.append(AuditDraft::info("Test", "system", "3")).await.unwrap();
        let second = log.list(&PageRequest::after(token, 2)).await.unwrap();
        let messages: Vec<_> = second.items.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["2", "3"]);
    }
}
