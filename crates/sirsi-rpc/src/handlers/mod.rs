// crates/sirsi-rpc/src/handlers/mod.rs
//
// Handler registration for every RPC service.
// Each module registers one service's methods against the control plane.

use sirsi_facade::{ControlPlane, SchemaVersion};

use crate::router::RpcRouter;

pub mod admin;
pub mod contracts;
pub mod notification;
pub mod tenant;

pub const ADMIN_SERVICE_V1: &str = "sirsi.admin.v1.AdminService";
pub const ADMIN_SERVICE_V2: &str = "sirsi.admin.v2.AdminService";
pub const TENANT_SERVICE: &str = "sirsi.admin.v2.TenantService";
pub const NOTIFICATION_SERVICE: &str = "sirsi.admin.v2.NotificationService";
pub const CONTRACTS_SERVICE: &str = "sirsi.contracts.v1.ContractsService";

/// Router with every service of the admin surface registered.
pub fn build_router(plane: &ControlPlane) -> RpcRouter {
    let mut router = RpcRouter::new();
    for version in SchemaVersion::ALL {
        admin::register(&mut router, plane, version);
    }
    tenant::register(&mut router, plane);
    notification::register(&mut router, plane);
    contracts::register(&mut router, plane);
    router
}
