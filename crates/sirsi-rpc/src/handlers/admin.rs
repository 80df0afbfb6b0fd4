// crates/sirsi-rpc/src/handlers/admin.rs
//
// AdminService: estates, users, settings, audit trail, and the system
// overview. Registered once per schema version; the versions share every
// handler and differ only in the overview shape.

use sirsi_facade::messages::*;
use sirsi_facade::{ControlPlane, SchemaVersion};

use crate::router::{Empty, RpcRouter};

use super::{ADMIN_SERVICE_V1, ADMIN_SERVICE_V2};

pub fn service_name(version: SchemaVersion) -> &'static str {
    match version {
        SchemaVersion::V1 => ADMIN_SERVICE_V1,
        SchemaVersion::V2 => ADMIN_SERVICE_V2,
    }
}

pub fn register(router: &mut RpcRouter, plane: &ControlPlane, version: SchemaVersion) {
    router
        .service(service_name(version))
        .with_state(plane.clone())
        // Estates
        .method("ListEstates", |p: ControlPlane, req: ListEstatesRequest| async move {
            p.list_estates(req).await
        })
        .method("GetEstate", |p: ControlPlane, req: GetEstateRequest| async move {
            p.get_estate(req).await
        })
        .method("CreateEstate", |p: ControlPlane, req: CreateEstateRequest| async move {
            p.create_estate(req).await
        })
        .method("UpdateEstate", |p: ControlPlane, req: UpdateEstateRequest| async move {
            p.update_estate(req).await
        })
        .method("DeleteEstate", |p: ControlPlane, req: DeleteEstateRequest| async move {
            p.delete_estate(req).await
        })
        // Overview
        .method("GetSystemOverview", move |p: ControlPlane, _: Empty| async move {
            p.get_system_overview(version).await
        })
        // Settings
        .method("GetSettings", |p: ControlPlane, _: Empty| async move {
            p.get_settings().await
        })
        .method("UpdateSettings", |p: ControlPlane, req: UpdateSettingsRequest| async move {
            p.update_settings(req).await
        })
        // Audit
        .method("ListAuditTrail", |p: ControlPlane, req: ListAuditTrailRequest| async move {
            p.list_audit_trail(req).await
        })
        // Users
        .method("ListUsers", |p: ControlPlane, req: ListUsersRequest| async move {
            p.list_users(req).await
        })
        .method("CreateUser", |p: ControlPlane, req: CreateUserRequest| async move {
            p.create_user(req).await
        })
        .method("ManageUserRole", |p: ControlPlane, req: ManageUserRoleRequest| async move {
            p.manage_user_role(req).await
        })
        // Developer telemetry: known methods without logic behind them.
        .pending("LogDevSession")
        .pending("GetDevMetrics")
        .pending("SyncGitHubStats");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_names_per_version() {
        assert_eq!(service_name(SchemaVersion::V1), "sirsi.admin.v1.AdminService");
        assert_eq!(service_name(SchemaVersion::V2), "sirsi.admin.v2.AdminService");
    }
}
