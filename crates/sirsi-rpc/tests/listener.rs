// crates/sirsi-rpc/tests/listener.rs
//
// Calls over a real socket: the full tonic stack, including the routes
// outside every mounted service.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::oneshot;

use sirsi_core::estate::Estate;
use sirsi_core::tenant::Tenant;
use sirsi_core::user::User;
use sirsi_facade::{Backends, ControlPlane};
use sirsi_rpc::{RpcConfig, SirsiRpcServer};
use sirsi_store::{
    InMemorySettingsStore, MemoryAuditLog, MemoryContractLedger, MemoryOutbox, MemoryRegistry,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A port the OS just handed out and released.
fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Serve on a fresh port. Returns the base URL and the shutdown trigger.
async fn start() -> (String, oneshot::Sender<()>) {
    let plane = ControlPlane::new(Backends {
        settings: Arc::new(InMemorySettingsStore::new()),
        estates: Arc::new(MemoryRegistry::<Estate>::new()),
        tenants: Arc::new(MemoryRegistry::<Tenant>::new()),
        users: Arc::new(MemoryRegistry::<User>::new()),
        notifications: Arc::new(MemoryOutbox::new()),
        audit: Arc::new(MemoryAuditLog::new()),
        contracts: Arc::new(MemoryContractLedger::new()),
    });
    let port = free_port();
    let config = RpcConfig {
        host: "127.0.0.1".to_string(),
        port,
        ..RpcConfig::default()
    };
    let server = SirsiRpcServer::new(config, plane);

    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let _ = server
            .serve_with_shutdown(async {
                let _ = rx.await;
            })
            .await;
    });

    let base = format!("http://127.0.0.1:{}", port);
    wait_until_up(&base).await;
    (base, tx)
}

async fn wait_until_up(base: &str) {
    let client = reqwest::Client::new();
    for _ in 0..100 {
        if client.post(format!("{}/ping/Ping", base)).send().await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server at {} never came up", base);
}

async fn post(base: &str, path: &str, body: Value) -> (u16, String, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{}{}", base, path))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let json = resp.json().await.unwrap();
    (status, content_type, json)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_unknown_service_over_the_wire_is_json_unimplemented() {
    let (base, shutdown) = start().await;

    let (status, content_type, body) =
        post(&base, "/sirsi.admin.v3.AdminService/GetSettings", json!({})).await;
    assert_eq!(status, 501);
    assert_eq!(content_type, "application/json");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "unimplemented");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_known_and_unknown_methods_over_the_wire() {
    let (base, shutdown) = start().await;

    let (status, _, body) =
        post(&base, "/sirsi.admin.v2.AdminService/GetSettings", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["result"]["settings"]["activeRegion"], "us-central1");

    let (status, _, body) = post(&base, "/sirsi.admin.v2.AdminService/Nope", json!({})).await;
    assert_eq!(status, 501);
    assert_eq!(body["error"]["code"], "unimplemented");

    let _ = shutdown.send(());
}
