// crates/sirsi-daemon/tests/wiring.rs
//
// Integration tests for the daemon's wiring: a file-backed control plane
// that survives a restart, and the outbox shared between the facade and the
// delivery side.
//
// The daemon is a binary crate with no lib.rs, so these tests assemble the
// same stack from the public APIs of the library crates.

use std::sync::Arc;

use uuid::Uuid;

use sirsi_core::estate::Estate;
use sirsi_core::notification::{NotificationDraft, NotificationStatus};
use sirsi_core::settings::SettingsPatch;
use sirsi_core::tenant::Tenant;
use sirsi_core::traits::NotificationOutbox;
use sirsi_core::user::User;
use sirsi_facade::messages::{ListNotificationsRequest, UpdateSettingsRequest};
use sirsi_facade::{Backends, ControlPlane, SchemaVersion};
use sirsi_store::{
    FileSettingsStore, MemoryAuditLog, MemoryContractLedger, MemoryOutbox, MemoryRegistry,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a temporary settings path using UUID to avoid conflicts.
fn temp_settings_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("sirsi_test_{}_{}.json", label, Uuid::now_v7()))
}

/// Assemble a control plane the way the daemon does at startup.
async fn boot(settings_path: &std::path::Path) -> ControlPlane {
    let settings = FileSettingsStore::open(settings_path).await.unwrap();
    ControlPlane::new(Backends {
        settings: Arc::new(settings),
        estates: Arc::new(MemoryRegistry::<Estate>::new()),
        tenants: Arc::new(MemoryRegistry::<Tenant>::new()),
        users: Arc::new(MemoryRegistry::<User>::new()),
        notifications: Arc::new(MemoryOutbox::new()),
        audit: Arc::new(MemoryAuditLog::new()),
        contracts: Arc::new(MemoryContractLedger::new()),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_settings_survive_restart() {
    let path = temp_settings_path("restart");

    let plane = boot(&path).await;
    let updated = plane
        .update_settings(UpdateSettingsRequest {
            settings: SettingsPatch {
                maintenance_mode: Some(true),
                sirsi_multiplier: Some(3.5),
                ..SettingsPatch::default()
            },
            expected_version: None,
        })
        .await
        .unwrap();
    drop(plane);

    let plane = boot(&path).await;
    let overview = plane.get_system_overview(SchemaVersion::V2).await.unwrap();
    assert!(overview.maintenance_mode);
    assert_eq!(overview.sirsi_multiplier, 3.5);
    assert_eq!(overview.active_region, "us-central1");

    // Same content, same version.
    assert_eq!(plane.get_settings().await.unwrap().version, updated.version);

    // Registries and the audit trail are in-memory only.
    assert_eq!(overview.total_tenants, 0);
    assert_eq!(overview.activity_feed.map(|f| f.len()), Some(0));

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_fresh_settings_path_starts_from_defaults() {
    let path = temp_settings_path("fresh");
    let plane = boot(&path).await;

    let resp = plane.get_settings().await.unwrap();
    assert!(!resp.settings.maintenance_mode);
    assert_eq!(resp.settings.active_region, "us-central1");
    assert_eq!(resp.settings.sirsi_multiplier, 2.0);

    // The default document is written out on first open.
    assert!(path.exists());
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_facade_and_delivery_share_the_outbox() {
    let plane = boot(&temp_settings_path("outbox")).await;

    let sent = plane
        .send_notification(NotificationDraft {
            recipient_id: "all".to_string(),
            title: "System Maintenance".to_string(),
            body: "Scheduled maintenance in 2 hours.".to_string(),
            kind: "warning".to_string(),
        })
        .await
        .unwrap();

    // The delivery loop works off the handle the facade hands out.
    let outbox = plane.notifications();
    let queued = outbox.queued(10).await.unwrap();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].id, sent.notification_id);
    outbox.mark_delivered(&sent.notification_id).await.unwrap();

    let listed = plane
        .list_notifications(ListNotificationsRequest::default())
        .await
        .unwrap();
    assert_eq!(listed.notifications[0].status, NotificationStatus::Delivered);
}
