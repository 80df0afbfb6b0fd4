// crates/sirsi-core/src/lib.rs
//
// sirsi-core: Core types, error taxonomy, and store traits for the Sirsi
// admin control plane.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines the entity data model, the cursor pagination scheme, and the
// trait contracts the aggregation facade composes over.

pub mod audit;
pub mod contract;
pub mod error;
pub mod estate;
pub mod notification;
pub mod pagination;
pub mod settings;
pub mod tenant;
pub mod traits;
pub mod user;
pub mod validate;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use sirsi_core::Estate;`

// Entity types
pub use audit::{AuditDraft, AuditLevel, AuditLogEntry};
pub use contract::{ContractDraft, ContractRecord, Money, BASE_CURRENCY};
pub use estate::{Estate, EstateDraft, EstateFilter, EstatePatch, EstatePhase};
pub use notification::{Notification, NotificationDraft, NotificationStatus};
pub use tenant::{Tenant, TenantDraft, TenantFilter, TenantPatch, TenantStatus};
pub use user::{User, UserDraft, UserFilter, UserPatch, UserRole};

// Settings
pub use settings::{Settings, SettingsPatch};

// Pagination
pub use pagination::{Cursor, Page, PageRequest, PaginationResponse};

// Error type
pub use error::AdminError;

// Traits
pub use traits::{AuditLog, ContractLedger, Entity, NotificationOutbox, Registry, SettingsStore};
