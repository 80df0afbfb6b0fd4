// crates/sirsi-rpc/src/lib.rs
//
// sirsi-rpc: Connect-style JSON RPC server and handlers for the Sirsi admin
// control plane.
//
// Provides a tonic-based server that mounts one endpoint per logical service
// (AdminService v1/v2, TenantService, NotificationService, ContractsService)
// and routes calls through a shared RpcRouter to the ControlPlane.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

// Re-export the main server types for ergonomic access.
pub use router::RpcRouter;
pub use server::{Endpoint, Gateway, JsonRpcResponse, RpcConfig, ServiceName, SirsiRpcServer};
