// crates/sirsi-core/src/traits.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::audit::{AuditDraft, AuditLogEntry};
use crate::contract::{ContractDraft, ContractRecord, Money};
use crate::error::AdminError;
use crate::notification::{Notification, NotificationDraft};
use crate::pagination::{Page, PageRequest};
use crate::settings::{Settings, SettingsPatch};

/// A registry-owned entity type with CRUD-shaped drafts and patches.
///
/// Implemented by `Estate`, `Tenant`, and `User`. The registry assigns ids;
/// drafts never carry one.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Fields accepted on create.
    type Draft: Send + 'static;
    /// Partial update; absent fields keep their value.
    type Patch: Send + 'static;
    /// List filter; `Default` matches everything.
    type Filter: Default + Send + Sync + 'static;

    /// Short lowercase name used in error messages ("estate", "tenant").
    const KIND: &'static str;

    fn id(&self) -> Uuid;

    /// Validate a draft and build the entity with the assigned id.
    fn from_draft(id: Uuid, draft: Self::Draft, now: DateTime<Utc>) -> Result<Self, AdminError>;

    /// Validate and apply a patch. Must never touch the id.
    fn apply_patch(&mut self, patch: Self::Patch) -> Result<(), AdminError>;

    fn matches(&self, filter: &Self::Filter) -> bool;

    /// `(key name, normalized value)` pairs that must be unique across the
    /// registry. Empty for entities without uniqueness constraints.
    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// CRUD contract of a domain registry.
///
/// Implemented by in-memory storage in sirsi-store
/// (`MemoryRegistry<E>`). Implementations provide their own concurrency
/// safety; uniqueness checks are atomic with the insert or update.
#[async_trait]
pub trait Registry<E: Entity>: Send + Sync {
    /// List entities matching `filter`, in creation order.
    async fn list(&self, filter: &E::Filter, page: &PageRequest) -> Result<Page<E>, AdminError>;

    /// Retrieve by id. Unknown id is `NotFound`.
    async fn get(&self, id: &Uuid) -> Result<E, AdminError>;

    /// Validate the draft, assign an id, and store it.
    async fn create(&self, draft: E::Draft) -> Result<E, AdminError>;

    /// Apply a patch. Unknown id is `NotFound`.
    async fn update(&self, id: &Uuid, patch: E::Patch) -> Result<E, AdminError>;

    /// Remove by id. Unknown id is `NotFound`.
    async fn delete(&self, id: &Uuid) -> Result<(), AdminError>;

    /// Number of entities matching `filter`.
    async fn count(&self, filter: &E::Filter) -> Result<u64, AdminError>;
}

/// Durable single-document settings storage.
///
/// Writes are serialized per store instance and replace the whole document
/// atomically. A failed write leaves the served value unchanged.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// The last successfully persisted document, or the default.
    async fn get(&self) -> Settings;

    /// Replace the whole document.
    async fn set(&self, settings: Settings) -> Result<(), AdminError>;

    /// Atomic read-modify-write. When `expected_version` is given and does not
    /// match the current document's version, nothing is written and a
    /// `Validation` error is returned.
    async fn apply(
        &self,
        patch: SettingsPatch,
        expected_version: Option<&str>,
    ) -> Result<Settings, AdminError>;
}

/// Storage for outbound notifications and their delivery state.
#[async_trait]
pub trait NotificationOutbox: Send + Sync {
    /// Store a new notification in the `Queued` state.
    async fn enqueue(&self, draft: NotificationDraft) -> Result<Notification, AdminError>;

    async fn get(&self, id: &Uuid) -> Result<Notification, AdminError>;

    async fn list(&self, page: &PageRequest) -> Result<Page<Notification>, AdminError>;

    /// Oldest queued notifications first, at most `limit`.
    async fn queued(&self, limit: usize) -> Result<Vec<Notification>, AdminError>;

    async fn mark_delivered(&self, id: &Uuid) -> Result<Notification, AdminError>;

    async fn mark_failed(&self, id: &Uuid, reason: String) -> Result<Notification, AdminError>;
}

/// Append-only audit trail.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(&self, draft: AuditDraft) -> Result<AuditLogEntry, AdminError>;

    /// Entries in append order.
    async fn list(&self, page: &PageRequest) -> Result<Page<AuditLogEntry>, AdminError>;

    /// The `n` most recent entries, newest first.
    async fn recent(&self, n: usize) -> Result<Vec<AuditLogEntry>, AdminError>;

    async fn count(&self) -> Result<u64, AdminError>;
}

/// Read/append access to the contracts domain.
#[async_trait]
pub trait ContractLedger: Send + Sync {
    async fn record(&self, draft: ContractDraft) -> Result<ContractRecord, AdminError>;

    async fn list(&self, page: &PageRequest) -> Result<Page<ContractRecord>, AdminError>;

    async fn count(&self) -> Result<u64, AdminError>;

    /// Sum of all contracts created at or after `since`, in the base currency.
    async fn revenue_since(&self, since: DateTime<Utc>) -> Result<Money, AdminError>;
}
