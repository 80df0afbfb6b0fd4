// crates/sirsi-store/src/lib.rs
//
// sirsi-store: Storage layer for the Sirsi admin control plane.
//
// Provides the JSON file-backed settings document store (plus an in-memory
// twin for tests), a generic concurrent in-memory registry instantiated per
// entity type, the notification outbox, the append-only audit log, and the
// contract ledger.

use std::sync::PoisonError;

use sirsi_core::error::AdminError;

pub mod audit;
pub mod ledger;
pub mod outbox;
pub mod registry;
pub mod settings;

// Re-export key types for ergonomic access from downstream crates.
pub use audit::MemoryAuditLog;
pub use ledger::MemoryContractLedger;
pub use outbox::MemoryOutbox;
pub use registry::MemoryRegistry;
pub use settings::{FileSettingsStore, InMemorySettingsStore};

/// Map a poisoned lock to an internal error.
pub(crate) fn poisoned<T>(e: PoisonError<T>) -> AdminError {
    AdminError::Internal(format!("RwLock poisoned: {}", e))
}
