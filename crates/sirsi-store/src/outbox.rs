// crates/sirsi-store/src/outbox.rs
//
// In-memory notification outbox implementing `NotificationOutbox`.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use sirsi_core::error::AdminError;
use sirsi_core::notification::{Notification, NotificationDraft, NotificationStatus};
use sirsi_core::pagination::{paginate, Page, PageRequest};
use sirsi_core::traits::NotificationOutbox;

use crate::poisoned;

#[derive(Debug)]
struct Inner {
    next_seq: u64,
    by_seq: BTreeMap<u64, Notification>,
    seq_of: HashMap<Uuid, u64>,
}

/// Notifications in send order, with their delivery state.
#[derive(Debug)]
pub struct MemoryOutbox {
    inner: RwLock<Inner>,
}

impl MemoryOutbox {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_seq: 1,
                by_seq: BTreeMap::new(),
                seq_of: HashMap::new(),
            }),
        }
    }

    fn transition(
        &self,
        id: &Uuid,
        next: NotificationStatus,
        reason: Option<String>,
    ) -> Result<Notification, AdminError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        let seq = *inner
            .seq_of
            .get(id)
            .ok_or_else(|| AdminError::not_found("notification", id))?;
        let notification = inner
            .by_seq
            .get_mut(&seq)
            .ok_or_else(|| AdminError::not_found("notification", id))?;
        notification.transition(next, reason)?;
        Ok(notification.clone())
    }
}

impl Default for MemoryOutbox {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationOutbox for MemoryOutbox {
    async fn enqueue(&self, draft: NotificationDraft) -> Result<Notification, AdminError> {
        let notification = Notification::queued(Uuid::now_v7(), draft, Utc::now())?;
        let mut inner = self.inner.write().map_err(poisoned)?;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.seq_of.insert(notification.id, seq);
        inner.by_seq.insert(seq, notification.clone());
        Ok(notification)
    }

    async fn get(&self, id: &Uuid) -> Result<Notification, AdminError> {
        let inner = self.inner.read().map_err(poisoned)?;
        inner
            .seq_of
            .get(id)
            .and_then(|seq| inner.by_seq.get(seq))
            .cloned()
            .ok_or_else(|| AdminError::not_found("notification", id))
    }

    async fn list(&self, page: &PageRequest) -> Result<Page<Notification>, AdminError> {
        let inner = self.inner.read().map_err(poisoned)?;
        let total = inner.by_seq.len() as u64;
        paginate(
            inner.by_seq.iter().map(|(seq, n)| (*seq, n.clone())),
            page,
            total,
        )
    }

    async fn queued(&self, limit: usize) -> Result<Vec<Notification>, AdminError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .by_seq
            .values()
            .filter(|n| n.status == NotificationStatus::Queued)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn mark_delivered(&self, id: &Uuid) -> Result<Notification, AdminError> {
        self.transition(id, NotificationStatus::Delivered, None)
    }

    async fn mark_failed(&self, id: &Uuid, reason: String) -> Result<Notification, AdminError> {
        self.transition(id, NotificationStatus::Failed, Some(reason))
    }
}
