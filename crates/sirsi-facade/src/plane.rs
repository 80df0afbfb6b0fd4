// crates/sirsi-facade/src/plane.rs
//
// ControlPlane: one async operation per admin RPC method.
//
// Registry errors pass through unchanged. Composed reads (the system
// overview) run their sub-reads concurrently and fail as a whole with the
// first error. There is no cross-registry snapshot: counts and the feed may
// reflect slightly different instants.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};

use sirsi_core::audit::AuditDraft;
use sirsi_core::contract::ContractRecord;
use sirsi_core::error::AdminError;
use sirsi_core::estate::Estate;
use sirsi_core::settings::SettingsPatch;
use sirsi_core::tenant::{Tenant, TenantFilter, TenantPatch, TenantStatus};
use sirsi_core::traits::{AuditLog, ContractLedger, NotificationOutbox, Registry, SettingsStore};
use sirsi_core::user::{User, UserPatch};

use crate::audit_writer::{AuditWriter, RetryPolicy};
use crate::messages::*;
use crate::schema::SchemaVersion;

/// Number of audit entries shown in the overview's activity feed.
pub const DEFAULT_ACTIVITY_FEED_LEN: usize = 10;

/// Identity recorded on audit entries. There is a single operator scope.
const ACTOR: &str = "admin";

const ADMIN_SOURCE: &str = "AdminService";
const TENANT_SOURCE: &str = "TenantService";

/// Storage collaborators the control plane composes.
#[derive(Clone)]
pub struct Backends {
    pub settings: Arc<dyn SettingsStore>,
    pub estates: Arc<dyn Registry<Estate>>,
    pub tenants: Arc<dyn Registry<Tenant>>,
    pub users: Arc<dyn Registry<User>>,
    pub notifications: Arc<dyn NotificationOutbox>,
    pub audit: Arc<dyn AuditLog>,
    pub contracts: Arc<dyn ContractLedger>,
}

/// The aggregation facade. Cheap to clone; every clone shares the same
/// backends.
#[derive(Clone)]
pub struct ControlPlane {
    backends: Backends,
    audit: AuditWriter,
    activity_feed_len: usize,
}

impl std::fmt::Debug for ControlPlane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlPlane")
            .field("activity_feed_len", &self.activity_feed_len)
            .finish()
    }
}

impl ControlPlane {
    pub fn new(backends: Backends) -> Self {
        let audit = AuditWriter::new(backends.audit.clone());
        Self {
            backends,
            audit,
            activity_feed_len: DEFAULT_ACTIVITY_FEED_LEN,
        }
    }

    /// Set how many audit entries the v2 overview includes.
    pub fn with_activity_feed_len(mut self, len: usize) -> Self {
        self.activity_feed_len = len;
        self
    }

    /// Override the background retry schedule for audit appends.
    pub fn with_audit_retry(mut self, policy: RetryPolicy) -> Self {
        self.audit = self.audit.with_policy(policy);
        self
    }

    /// The outbox, for the delivery loop.
    pub fn notifications(&self) -> Arc<dyn NotificationOutbox> {
        self.backends.notifications.clone()
    }

    async fn audit(&self, source: &str, message: String) {
        // The retry task runs detached; its outcome is logged there.
        let _ = self.audit.record(AuditDraft::info(source, ACTOR, message)).await;
    }

    // -----------------------------------------------------------------------
    // Estates
    // -----------------------------------------------------------------------

    pub async fn list_estates(
        &self,
        request: ListEstatesRequest,
    ) -> Result<ListEstatesResponse, AdminError> {
        let page = self
            .backends
            .estates
            .list(&request.filter, &request.pagination)
            .await?;
        Ok(page.into())
    }

    pub async fn get_estate(&self, request: GetEstateRequest) -> Result<Estate, AdminError> {
        self.backends.estates.get(&request.id).await
    }

    pub async fn create_estate(&self, request: CreateEstateRequest) -> Result<Estate, AdminError> {
        let estate = self.backends.estates.create(request.estate).await?;
        tracing::info!("Estate created: {} ({})", estate.name, estate.id);
        Ok(estate)
    }

    pub async fn update_estate(&self, request: UpdateEstateRequest) -> Result<Estate, AdminError> {
        self.backends
            .estates
            .update(&request.id, request.estate)
            .await
    }

    pub async fn delete_estate(
        &self,
        request: DeleteEstateRequest,
    ) -> Result<DeleteEstateResponse, AdminError> {
        let estate = self.backends.estates.get(&request.id).await?;
        self.backends.estates.delete(&request.id).await?;
        tracing::info!("Estate deleted: {} ({})", estate.name, estate.id);
        self.audit(ADMIN_SOURCE, format!("Estate deleted: {}", estate.name))
            .await;
        Ok(DeleteEstateResponse { success: true })
    }

    // -----------------------------------------------------------------------
    // Tenants
    // -----------------------------------------------------------------------

    pub async fn list_tenants(
        &self,
        request: ListTenantsRequest,
    ) -> Result<ListTenantsResponse, AdminError> {
        let page = self
            .backends
            .tenants
            .list(&request.filter, &request.pagination)
            .await?;
        Ok(page.into())
    }

    pub async fn get_tenant(&self, request: GetTenantRequest) -> Result<Tenant, AdminError> {
        self.backends.tenants.get(&request.id).await
    }

    pub async fn create_tenant(&self, request: CreateTenantRequest) -> Result<Tenant, AdminError> {
        let tenant = self.backends.tenants.create(request.tenant).await?;
        tracing::info!("Tenant created: {} ({})", tenant.slug, tenant.id);
        self.audit(TENANT_SOURCE, format!("Tenant created: {}", tenant.slug))
            .await;
        Ok(tenant)
    }

    /// Patch a tenant. A patch that moves it to `Deactivated` is audited the
    /// same way as `deactivate_tenant`.
    pub async fn update_tenant(&self, request: UpdateTenantRequest) -> Result<Tenant, AdminError> {
        let deactivating = request.tenant.status == Some(TenantStatus::Deactivated);
        let before = if deactivating {
            Some(self.backends.tenants.get(&request.id).await?.status)
        } else {
            None
        };

        let tenant = self
            .backends
            .tenants
            .update(&request.id, request.tenant)
            .await?;

        if deactivating && before != Some(TenantStatus::Deactivated) {
            self.record_deactivation(&tenant).await;
        }
        Ok(tenant)
    }

    /// Move a tenant to `Deactivated`. Deactivating an already deactivated
    /// tenant returns it unchanged and writes no audit entry.
    pub async fn deactivate_tenant(
        &self,
        request: DeactivateTenantRequest,
    ) -> Result<DeactivateTenantResponse, AdminError> {
        let current = self.backends.tenants.get(&request.id).await?;
        if current.status == TenantStatus::Deactivated {
            return Ok(DeactivateTenantResponse { tenant: current });
        }

        let patch = TenantPatch {
            status: Some(TenantStatus::Deactivated),
            ..Default::default()
        };
        let tenant = self.backends.tenants.update(&request.id, patch).await?;
        self.record_deactivation(&tenant).await;
        Ok(DeactivateTenantResponse { tenant })
    }

    async fn record_deactivation(&self, tenant: &Tenant) {
        tracing::info!("Tenant deactivated: {} ({})", tenant.slug, tenant.id);
        self.audit(TENANT_SOURCE, format!("Tenant deactivated: {}", tenant.slug))
            .await;
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub async fn list_users(&self, request: ListUsersRequest) -> Result<ListUsersResponse, AdminError> {
        let page = self
            .backends
            .users
            .list(&request.filter, &request.pagination)
            .await?;
        Ok(page.into())
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, AdminError> {
        let user = self.backends.users.create(request.user).await?;
        tracing::info!("User created: {} as {}", user.email, user.role);
        Ok(user)
    }

    pub async fn manage_user_role(
        &self,
        request: ManageUserRoleRequest,
    ) -> Result<ManageUserRoleResponse, AdminError> {
        let patch = UserPatch {
            role: Some(request.role),
            ..Default::default()
        };
        let user = self.backends.users.update(&request.user_id, patch).await?;
        tracing::info!("ManageUserRole: {} -> {}", user.email, user.role);
        self.audit(
            ADMIN_SOURCE,
            format!("Role changed: {} -> {}", user.email, user.role),
        )
        .await;
        Ok(ManageUserRoleResponse {
            success: true,
            user,
        })
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    pub async fn send_notification(
        &self,
        request: SendNotificationRequest,
    ) -> Result<SendNotificationResponse, AdminError> {
        let notification = self.backends.notifications.enqueue(request).await?;
        tracing::info!(
            "SendNotification to {}: {}",
            notification.recipient_id,
            notification.title
        );
        Ok(SendNotificationResponse {
            notification_id: notification.id,
            status: notification.status,
        })
    }

    pub async fn list_notifications(
        &self,
        request: ListNotificationsRequest,
    ) -> Result<ListNotificationsResponse, AdminError> {
        let page = self
            .backends
            .notifications
            .list(&request.pagination)
            .await?;
        Ok(page.into())
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    pub async fn get_settings(&self) -> Result<GetSettingsResponse, AdminError> {
        let settings = self.backends.settings.get().await;
        Ok(GetSettingsResponse {
            version: settings.version(),
            settings,
        })
    }

    /// Apply a partial settings update as one atomic read-modify-write.
    ///
    /// With `expectedVersion`, the update only applies if nobody else has
    /// written since that version was read.
    pub async fn update_settings(
        &self,
        request: UpdateSettingsRequest,
    ) -> Result<UpdateSettingsResponse, AdminError> {
        if request.settings.is_empty() {
            return Err(AdminError::Validation(
                "UpdateSettings requires at least one field".to_string(),
            ));
        }
        let summary = describe_patch(&request.settings);
        let settings = self
            .backends
            .settings
            .apply(request.settings, request.expected_version.as_deref())
            .await?;
        tracing::info!("UpdateSettings: {}", summary);
        self.audit(ADMIN_SOURCE, format!("Settings updated: {}", summary))
            .await;
        Ok(UpdateSettingsResponse {
            success: true,
            version: settings.version(),
            settings,
        })
    }

    // -----------------------------------------------------------------------
    // Audit trail
    // -----------------------------------------------------------------------

    pub async fn list_audit_trail(
        &self,
        request: ListAuditTrailRequest,
    ) -> Result<ListAuditTrailResponse, AdminError> {
        let page = self.backends.audit.list(&request.pagination).await?;
        Ok(page.into())
    }

    // -----------------------------------------------------------------------
    // Contracts
    // -----------------------------------------------------------------------

    pub async fn record_contract(
        &self,
        request: RecordContractRequest,
    ) -> Result<ContractRecord, AdminError> {
        let record = self.backends.contracts.record(request.contract).await?;
        tracing::info!(
            "Contract recorded: {} ({} cents {})",
            record.reference,
            record.amount.amount_cents,
            record.amount.currency
        );
        Ok(record)
    }

    pub async fn list_contracts(
        &self,
        request: ListContractsRequest,
    ) -> Result<ListContractsResponse, AdminError> {
        let page = self.backends.contracts.list(&request.pagination).await?;
        Ok(page.into())
    }

    // -----------------------------------------------------------------------
    // System overview
    // -----------------------------------------------------------------------

    /// Compose the dashboard snapshot. Sub-reads run concurrently; the first
    /// failure fails the whole call.
    pub async fn get_system_overview(
        &self,
        version: SchemaVersion,
    ) -> Result<SystemOverview, AdminError> {
        let extended = version.has_extended_overview();
        let since = month_start(Utc::now());
        let b = &self.backends;
        let all_tenants = TenantFilter::default();

        let (settings, total_tenants, total_contracts, revenue_mtd, activity_feed) = tokio::try_join!(
            async { Ok::<_, AdminError>(b.settings.get().await) },
            b.tenants.count(&all_tenants),
            b.contracts.count(),
            async {
                if extended {
                    b.contracts.revenue_since(since).await.map(Some)
                } else {
                    Ok(None)
                }
            },
            async {
                if extended {
                    b.audit.recent(self.activity_feed_len).await.map(Some)
                } else {
                    Ok(None)
                }
            },
        )?;

        Ok(SystemOverview {
            total_tenants,
            total_contracts,
            sirsi_multiplier: settings.sirsi_multiplier,
            maintenance_mode: settings.maintenance_mode,
            active_region: settings.active_region,
            revenue_mtd,
            activity_feed,
        })
    }
}

/// Midnight UTC on the first day of `now`'s month.
fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .with_day(1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or(now)
}

/// Human summary of the fields a patch touches, e.g. `sirsiMultiplier -> 3.5`.
fn describe_patch(patch: &SettingsPatch) -> String {
    let mut parts = Vec::new();
    if let Some(m) = patch.maintenance_mode {
        parts.push(format!("maintenanceMode -> {}", m));
    }
    if let Some(r) = &patch.active_region {
        parts.push(format!("activeRegion -> {}", r));
    }
    if let Some(x) = patch.sirsi_multiplier {
        parts.push(format!("sirsiMultiplier -> {}", x));
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_month_start_truncates_to_first_midnight() {
        let now = Utc.with_ymd_and_hms(2026, 2, 17, 13, 45, 9).unwrap();
        let start = month_start(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_describe_patch_lists_only_present_fields() {
        let patch = SettingsPatch {
            sirsi_multiplier: Some(3.5),
            maintenance_mode: Some(true),
            ..Default::default()
        };
        assert_eq!(
            describe_patch(&patch),
            "maintenanceMode -> true, sirsiMultiplier -> 3.5"
        );
    }
}
