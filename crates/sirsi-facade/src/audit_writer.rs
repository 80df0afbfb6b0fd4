// crates/sirsi-facade/src/audit_writer.rs
//
// Best-effort audit appends for cross-domain side effects.
//
// The append is tried once inline. If it fails, a background task retries
// with exponential backoff; the final failure is logged at error level. The
// caller's operation never fails because of the audit trail.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use sirsi_core::audit::AuditDraft;
use sirsi_core::traits::AuditLog;

/// Background retry schedule for failed audit appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the inline one.
    pub retries: u32,
    /// Delay before the first retry; doubled after each failure.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            initial_backoff: Duration::from_millis(200),
        }
    }
}

#[derive(Clone)]
pub struct AuditWriter {
    log: Arc<dyn AuditLog>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for AuditWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditWriter")
            .field("policy", &self.policy)
            .finish()
    }
}

impl AuditWriter {
    pub fn new(log: Arc<dyn AuditLog>) -> Self {
        Self {
            log,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Append `draft`, falling back to background retries on failure.
    ///
    /// Returns the retry task handle when the inline attempt failed. The task
    /// resolves to `true` once an append succeeded. Dropping the handle does
    /// not cancel the retries.
    pub async fn record(&self, draft: AuditDraft) -> Option<JoinHandle<bool>> {
        match self.log.append(draft.clone()).await {
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(
                    "Audit append failed ({}), scheduling {} retries: {}",
                    e,
                    self.policy.retries,
                    draft.message
                );
                let log = self.log.clone();
                let policy = self.policy;
                Some(tokio::spawn(retry_append(log, draft, policy)))
            }
        }
    }
}

async fn retry_append(log: Arc<dyn AuditLog>, draft: AuditDraft, policy: RetryPolicy) -> bool {
    let mut backoff = policy.initial_backoff;
    for attempt in 1..=policy.retries {
        tokio::time::sleep(backoff).await;
        match log.append(draft.clone()).await {
            Ok(entry) => {
                tracing::debug!("Audit entry {} appended on retry {}", entry.id, attempt);
                return true;
            }
            Err(e) => {
                tracing::warn!("Audit retry {}/{} failed: {}", attempt, policy.retries, e);
                backoff = backoff.saturating_mul(2);
            }
        }
    }
    tracing::error!(
        "Dropping audit entry after {} retries: [{}] {}",
        policy.retries,
        draft.source,
        draft.message
    );
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    use sirsi_core::audit::AuditLogEntry;
    use sirsi_core::error::AdminError;
    use sirsi_core::pagination::{Page, PageRequest};

    /// Fails the first `failures` appends, then succeeds.
    struct FlakyLog {
        failures: u32,
        attempts: AtomicU32,
    }

    impl FlakyLog {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                attempts: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl AuditLog for FlakyLog {
        async fn append(&self, draft: AuditDraft) -> Result<AuditLogEntry, AdminError> {
            let n = self.attempts.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(AdminError::Io("audit sink unavailable".to_string()));
            }
            Ok(draft.into_entry(Uuid::now_v7(), Utc::now()))
        }

        async fn list(&self, _page: &PageRequest) -> Result<Page<AuditLogEntry>, AdminError> {
            Ok(Page::empty())
        }

        async fn recent(&self, _n: usize) -> Result<Vec<AuditLogEntry>, AdminError> {
            Ok(Vec::new())
        }

        async fn count(&self) -> Result<u64, AdminError> {
            Ok(0)
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            retries: 3,
            initial_backoff: Duration::from_millis(1),
        }
    }

    fn draft() -> AuditDraft {
        AuditDraft::info("AdminService", "admin", "Settings updated")
    }

    #[tokio::test]
    async fn test_inline_success_spawns_nothing() {
        let log = Arc::new(FlakyLog::new(0));
        let writer = AuditWriter::new(log.clone()).with_policy(fast_policy());
        assert!(writer.record(draft()).await.is_none());
        assert_eq!(log.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_recovers_after_transient_failures() {
        let log = Arc::new(FlakyLog::new(2));
        let writer = AuditWriter::new(log.clone()).with_policy(fast_policy());
        let handle = writer.record(draft()).await.expect("retry task");
        assert!(handle.await.unwrap());
        assert_eq!(log.attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_policy_retries() {
        let log = Arc::new(FlakyLog::new(u32::MAX));
        let writer = AuditWriter::new(log.clone()).with_policy(fast_policy());
        let handle = writer.record(draft()).await.expect("retry task");
        assert!(!handle.await.unwrap());
        assert_eq!(log.attempts.load(Ordering::SeqCst), 4);
    }
}
