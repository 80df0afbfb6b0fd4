// crates/sirsi-store/tests/settings_file.rs
//
// Durability and consistency tests for the file-backed settings store.

use std::path::PathBuf;
use std::sync::Arc;

use uuid::Uuid;

use sirsi_core::error::AdminError;
use sirsi_core::settings::{Settings, SettingsPatch};
use sirsi_core::traits::SettingsStore;
use sirsi_store::FileSettingsStore;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a unique temporary directory path using a UUID to avoid conflicts.
fn temp_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sirsi_test_{}_{}", label, Uuid::now_v7()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn custom_settings() -> Settings {
    Settings {
        maintenance_mode: true,
        active_region: "europe-west4".to_string(),
        sirsi_multiplier: 3.25,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_absent_file_created_with_default() {
    let path = temp_dir("absent").join("settings.json");
    let store = FileSettingsStore::open(&path).await.unwrap();

    assert_eq!(store.get().await, Settings::default());
    let on_disk: Settings = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(on_disk, Settings::default());
}

#[tokio::test]
async fn test_set_then_get_roundtrip_survives_reopen() {
    let path = temp_dir("roundtrip").join("settings.json");
    {
        let store = FileSettingsStore::open(&path).await.unwrap();
        store.set(custom_settings()).await.unwrap();
        assert_eq!(store.get().await, custom_settings());
    }

    let reopened = FileSettingsStore::open(&path).await.unwrap();
    assert_eq!(reopened.get().await, custom_settings());
}

#[tokio::test]
async fn test_on_disk_schema_is_camel_case() {
    let path = temp_dir("schema").join("settings.json");
    let store = FileSettingsStore::open(&path).await.unwrap();
    store.set(custom_settings()).await.unwrap();

    let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw["maintenanceMode"], true);
    assert_eq!(raw["activeRegion"], "europe-west4");
    assert_eq!(raw["sirsiMultiplier"], 3.25);
}

#[tokio::test]
async fn test_corrupt_file_is_io_error() {
    let path = temp_dir("corrupt").join("settings.json");
    std::fs::write(&path, b"{ not json").unwrap();

    let err = FileSettingsStore::open(&path).await.unwrap_err();
    assert!(matches!(err, AdminError::Io(_)));
}

#[tokio::test]
async fn test_failed_write_keeps_served_value() {
    let dir = temp_dir("failed_write");
    let path = dir.join("settings.json");
    let store = FileSettingsStore::open(&path).await.unwrap();
    store.set(custom_settings()).await.unwrap();

    // Replace the document with a non-empty directory so the rename fails.
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir_all(path.join("blocker")).unwrap();

    let mut next = custom_settings();
    next.sirsi_multiplier = 9.0;
    let err = store.set(next).await.unwrap_err();
    assert!(matches!(err, AdminError::Io(_)));
    assert_eq!(store.get().await, custom_settings());
    assert!(!dir.join("settings.json.tmp").exists());
}

#[tokio::test]
async fn test_concurrent_patches_are_not_lost() {
    let path = temp_dir("concurrent").join("settings.json");
    let store = Arc::new(FileSettingsStore::open(&path).await.unwrap());

    // Each task flips a different field; serialized read-modify-write must
    // keep all of them.
    let a = {
        let store = store.clone();
        tokio::spawn(async move {
            store
                .apply(
                    SettingsPatch {
                        maintenance_mode: Some(true),
                        ..Default::default()
                    },
                    None,
                )
                .await
        })
    };
    let b = {
        let store = store.clone();
        tokio::spawn(async move {
            store
                .apply(
                    SettingsPatch {
                        active_region: Some("asia-east1".to_string()),
                        ..Default::default()
                    },
                    None,
                )
                .await
        })
    };
    let c = {
        let store = store.clone();
        tokio::spawn(async move {
            store
                .apply(
                    SettingsPatch {
                        sirsi_multiplier: Some(4.0),
                        ..Default::default()
                    },
                    None,
                )
                .await
        })
    };
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();
    c.await.unwrap().unwrap();

    let expected = Settings {
        maintenance_mode: true,
        active_region: "asia-east1".to_string(),
        sirsi_multiplier: 4.0,
    };
    assert_eq!(store.get().await, expected);
    let reopened = FileSettingsStore::open(&path).await.unwrap();
    assert_eq!(reopened.get().await, expected);
}

#[tokio::test]
async fn test_stale_version_rejected_without_write() {
    let path = temp_dir("cas").join("settings.json");
    let store = FileSettingsStore::open(&path).await.unwrap();
    let stale = store.get().await.version();

    store.set(custom_settings()).await.unwrap();
    let err = store
        .apply(
            SettingsPatch {
                sirsi_multiplier: Some(1.5),
                ..Default::default()
            },
            Some(&stale),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Validation(_)));
    assert_eq!(store.get().await, custom_settings());
}
