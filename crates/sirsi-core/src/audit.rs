// crates/sirsi-core/src/audit.rs
//
// Append-only audit trail entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditLevel {
    #[default]
    Info,
    Warn,
    Error,
}

/// A recorded audit entry. Never mutated or deleted once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub level: AuditLevel,
    /// Emitting component, e.g. "AdminService".
    pub source: String,
    pub message: String,
    /// Acting user, or "system".
    pub user: String,
}

/// Content of an entry before the log assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDraft {
    pub level: AuditLevel,
    pub source: String,
    pub message: String,
    pub user: String,
}

impl AuditDraft {
    pub fn info(source: &str, user: &str, message: impl Into<String>) -> Self {
        Self {
            level: AuditLevel::Info,
            source: source.to_string(),
            message: message.into(),
            user: user.to_string(),
        }
    }

    pub fn into_entry(self, id: Uuid, timestamp: DateTime<Utc>) -> AuditLogEntry {
        AuditLogEntry {
            id,
            timestamp,
            level: self.level,
            source: self.source,
            message: self.message,
            user: self.user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_wire_format() {
        assert_eq!(serde_json::to_value(AuditLevel::Info).unwrap(), "INFO");
        assert_eq!(serde_json::to_value(AuditLevel::Warn).unwrap(), "WARN");
    }

    #[test]
    fn test_into_entry_keeps_content() {
        let entry = AuditDraft::info("AdminService", "system", "Admin service initialized")
            .into_entry(Uuid::now_v7(), Utc::now());
        assert_eq!(entry.source, "AdminService");
        assert_eq!(entry.user, "system");
        assert_eq!(entry.level, AuditLevel::Info);
    }
}
