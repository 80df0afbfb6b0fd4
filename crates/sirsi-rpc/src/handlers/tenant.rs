// crates/sirsi-rpc/src/handlers/tenant.rs
//
// TenantService: ListTenants, GetTenant, CreateTenant, UpdateTenant,
// DeactivateTenant.

use sirsi_facade::messages::*;
use sirsi_facade::ControlPlane;

use crate::router::RpcRouter;

use super::TENANT_SERVICE;

pub fn register(router: &mut RpcRouter, plane: &ControlPlane) {
    router
        .service(TENANT_SERVICE)
        .with_state(plane.clone())
        .method("ListTenants", |p: ControlPlane, req: ListTenantsRequest| async move {
            p.list_tenants(req).await
        })
        .method("GetTenant", |p: ControlPlane, req: GetTenantRequest| async move {
            p.get_tenant(req).await
        })
        .method("CreateTenant", |p: ControlPlane, req: CreateTenantRequest| async move {
            p.create_tenant(req).await
        })
        .method("UpdateTenant", |p: ControlPlane, req: UpdateTenantRequest| async move {
            p.update_tenant(req).await
        })
        .method(
            "DeactivateTenant",
            |p: ControlPlane, req: DeactivateTenantRequest| async move {
                p.deactivate_tenant(req).await
            },
        );
}
