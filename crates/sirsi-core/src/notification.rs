// crates/sirsi-core/src/notification.rs
//
// Notifications and their delivery lifecycle.
//
// Valid transitions:
//   Queued -> Delivered
//   Queued -> Failed
// Terminal states never change again.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AdminError;
use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationStatus {
    Queued,
    Delivered,
    Failed,
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationStatus::Queued => write!(f, "Queued"),
            NotificationStatus::Delivered => write!(f, "Delivered"),
            NotificationStatus::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: String,
    pub title: String,
    pub body: String,
    /// Free-form category, e.g. "info" or "warning".
    #[serde(rename = "type")]
    pub kind: String,
    pub sent_at: DateTime<Utc>,
    pub status: NotificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// Caller-supplied content of a new notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NotificationDraft {
    pub recipient_id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
}

fn default_kind() -> String {
    "info".to_string()
}

impl Notification {
    /// Build a freshly queued notification.
    pub fn queued(id: Uuid, draft: NotificationDraft, now: DateTime<Utc>) -> Result<Self, AdminError> {
        validate::non_empty("recipientId", &draft.recipient_id)?;
        validate::non_empty("title", &draft.title)?;
        Ok(Notification {
            id,
            recipient_id: draft.recipient_id,
            title: draft.title,
            body: draft.body,
            kind: draft.kind,
            sent_at: now,
            status: NotificationStatus::Queued,
            failure_reason: None,
        })
    }

    /// Move to a terminal state. Fails unless currently `Queued`.
    pub fn transition(
        &mut self,
        next: NotificationStatus,
        failure_reason: Option<String>,
    ) -> Result<(), AdminError> {
        let valid = matches!(
            (self.status, next),
            (NotificationStatus::Queued, NotificationStatus::Delivered)
                | (NotificationStatus::Queued, NotificationStatus::Failed)
        );
        if !valid {
            return Err(AdminError::Validation(format!(
                "Invalid notification transition for {}: {} -> {}",
                self.id, self.status, next
            )));
        }
        self.status = next;
        if next == NotificationStatus::Failed {
            self.failure_reason = failure_reason;
        }
        Ok(())
    }
}
