// crates/sirsi-rpc/src/handlers/contracts.rs
//
// ContractsService: the ledger backing the overview's contract count and
// month-to-date revenue.

use sirsi_facade::messages::*;
use sirsi_facade::ControlPlane;

use crate::router::RpcRouter;

use super::CONTRACTS_SERVICE;

pub fn register(router: &mut RpcRouter, plane: &ControlPlane) {
    router
        .service(CONTRACTS_SERVICE)
        .with_state(plane.clone())
        .method("RecordContract", |p: ControlPlane, req: RecordContractRequest| async move {
            p.record_contract(req).await
        })
        .method("ListContracts", |p: ControlPlane, req: ListContractsRequest| async move {
            p.list_contracts(req).await
        });
}
