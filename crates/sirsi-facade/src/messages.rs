// crates/sirsi-facade/src/messages.rs
//
// Request and response messages for every control-plane operation.
// Field names follow the camelCase wire schema of the admin API.
// Requests that create or patch an entity deny unknown fields, so a
// client-supplied `id` inside a draft is rejected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sirsi_core::audit::AuditLogEntry;
use sirsi_core::contract::{ContractDraft, ContractRecord, Money};
use sirsi_core::estate::{Estate, EstateDraft, EstateFilter, EstatePatch};
use sirsi_core::notification::{Notification, NotificationDraft, NotificationStatus};
use sirsi_core::pagination::{Page, PageRequest, PaginationResponse};
use sirsi_core::settings::{Settings, SettingsPatch};
use sirsi_core::tenant::{Tenant, TenantDraft, TenantFilter, TenantPatch};
use sirsi_core::user::{User, UserDraft, UserFilter, UserRole};

// ---------------------------------------------------------------------------
// Estates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEstatesRequest {
    #[serde(default)]
    pub filter: EstateFilter,
    #[serde(default)]
    pub pagination: PageRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEstatesResponse {
    pub estates: Vec<Estate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    pub pagination: PaginationResponse,
}

impl From<Page<Estate>> for ListEstatesResponse {
    fn from(page: Page<Estate>) -> Self {
        Self {
            pagination: page.pagination(),
            next_page_token: page.next_page_token,
            estates: page.items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEstateRequest {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateEstateRequest {
    pub estate: EstateDraft,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateEstateRequest {
    pub id: Uuid,
    pub estate: EstatePatch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEstateRequest {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEstateResponse {
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Tenants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTenantsRequest {
    #[serde(default)]
    pub filter: TenantFilter,
    #[serde(default)]
    pub pagination: PageRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTenantsResponse {
    pub tenants: Vec<Tenant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    pub pagination: PaginationResponse,
}

impl From<Page<Tenant>> for ListTenantsResponse {
    fn from(page: Page<Tenant>) -> Self {
        Self {
            pagination: page.pagination(),
            next_page_token: page.next_page_token,
            tenants: page.items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTenantRequest {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTenantRequest {
    pub tenant: TenantDraft,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTenantRequest {
    pub id: Uuid,
    pub tenant: TenantPatch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateTenantRequest {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateTenantResponse {
    pub tenant: Tenant,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersRequest {
    #[serde(default)]
    pub filter: UserFilter,
    #[serde(default)]
    pub pagination: PageRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersResponse {
    pub users: Vec<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    pub pagination: PaginationResponse,
}

impl From<Page<User>> for ListUsersResponse {
    fn from(page: Page<User>) -> Self {
        Self {
            pagination: page.pagination(),
            next_page_token: page.next_page_token,
            users: page.items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserRequest {
    pub user: UserDraft,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ManageUserRoleRequest {
    pub user_id: Uuid,
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageUserRoleResponse {
    pub success: bool,
    pub user: User,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// The request body is the notification draft itself:
/// `{recipientId, title, body, type}`.
pub type SendNotificationRequest = NotificationDraft;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationResponse {
    pub notification_id: Uuid,
    pub status: NotificationStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsRequest {
    #[serde(default)]
    pub pagination: PageRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsResponse {
    pub notifications: Vec<Notification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    pub pagination: PaginationResponse,
}

impl From<Page<Notification>> for ListNotificationsResponse {
    fn from(page: Page<Notification>) -> Self {
        Self {
            pagination: page.pagination(),
            next_page_token: page.next_page_token,
            notifications: page.items,
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSettingsResponse {
    pub settings: Settings,
    /// Content version to pass back as `expectedVersion` on update.
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateSettingsRequest {
    pub settings: SettingsPatch,
    #[serde(default)]
    pub expected_version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsResponse {
    pub success: bool,
    pub settings: Settings,
    pub version: String,
}

// ---------------------------------------------------------------------------
// Audit trail
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditTrailRequest {
    #[serde(default)]
    pub pagination: PageRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditTrailResponse {
    pub logs: Vec<AuditLogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    pub pagination: PaginationResponse,
}

impl From<Page<AuditLogEntry>> for ListAuditTrailResponse {
    fn from(page: Page<AuditLogEntry>) -> Self {
        Self {
            pagination: page.pagination(),
            next_page_token: page.next_page_token,
            logs: page.items,
        }
    }
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecordContractRequest {
    pub contract: ContractDraft,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContractsRequest {
    #[serde(default)]
    pub pagination: PageRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContractsResponse {
    pub contracts: Vec<ContractRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    pub pagination: PaginationResponse,
}

impl From<Page<ContractRecord>> for ListContractsResponse {
    fn from(page: Page<ContractRecord>) -> Self {
        Self {
            pagination: page.pagination(),
            next_page_token: page.next_page_token,
            contracts: page.items,
        }
    }
}

// ---------------------------------------------------------------------------
// System overview
// ---------------------------------------------------------------------------

/// Dashboard snapshot composed from settings, tenants, contracts, and audit.
///
/// `revenue_mtd` and `activity_feed` are only populated for v2 callers and
/// are omitted from the v1 wire shape entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemOverview {
    pub total_tenants: u64,
    pub total_contracts: u64,
    pub sirsi_multiplier: f64,
    pub maintenance_mode: bool,
    pub active_region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_mtd: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_feed: Option<Vec<AuditLogEntry>>,
}
