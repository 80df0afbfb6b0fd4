// crates/sirsi-store/src/settings.rs
//
// Settings document stores.
//
// `FileSettingsStore` keeps the served document in memory and persists every
// write as a whole-file replace:
//   1. serialize to `<path>.tmp`
//   2. fsync the temp file
//   3. rename over `<path>`
// The in-memory value is swapped only after the rename succeeds, so readers
// see either the previous or the new document, never a partial one. Writers
// are serialized by a mutex that readers never take.
//
// A write runs in its own task. Once it holds the writer lock it either skips
// (the caller already went away) or persists and publishes to completion, so
// dropping the caller's future never leaves the disk ahead of memory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::{oneshot, Mutex, RwLock};

use sirsi_core::error::AdminError;
use sirsi_core::settings::{Settings, SettingsPatch};
use sirsi_core::traits::SettingsStore;

/// JSON file-backed settings store.
#[derive(Debug)]
pub struct FileSettingsStore {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    path: PathBuf,
    current: RwLock<Settings>,
    writer: Mutex<()>,
}

impl FileSettingsStore {
    /// Open the document at `path`.
    ///
    /// An absent file is created with the compiled-in default. A file that
    /// exists but cannot be read or parsed is an `Io` error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AdminError> {
        let path = path.into();

        let settings = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let settings: Settings = serde_json::from_slice(&bytes).map_err(|e| {
                    AdminError::Io(format!(
                        "Failed to parse settings at {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                settings.validate().map_err(|e| {
                    AdminError::Io(format!("Invalid settings at {}: {}", path.display(), e))
                })?;
                tracing::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    "Settings file not found at {}, creating default",
                    path.display()
                );
                let settings = Settings::default();
                write_document(&path, &settings).await?;
                settings
            }
            Err(e) => {
                return Err(AdminError::Io(format!(
                    "Failed to read settings at {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            shared: Arc::new(Shared {
                path,
                current: RwLock::new(settings),
                writer: Mutex::new(()),
            }),
        })
    }

    /// Location of the settings document.
    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    /// Compute the next document from the current one under the writer lock,
    /// then persist and publish it.
    ///
    /// The work runs in a spawned task. If the caller is dropped before the
    /// task gets the lock, nothing is written. Once writing starts, the file
    /// and the in-memory value are both updated before the lock is released.
    async fn commit<F>(&self, step: F) -> Result<Settings, AdminError>
    where
        F: FnOnce(&Settings) -> Result<Settings, AdminError> + Send + 'static,
    {
        let shared = self.shared.clone();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let _guard = shared.writer.lock().await;
            if tx.is_closed() {
                tracing::debug!("Settings write abandoned before it started");
                return;
            }

            let current = shared.current.read().await.clone();
            let outcome = match step(&current) {
                Ok(next) => match write_document(&shared.path, &next).await {
                    Ok(()) => {
                        *shared.current.write().await = next.clone();
                        Ok(next)
                    }
                    Err(e) => Err(e),
                },
                Err(e) => Err(e),
            };
            let _ = tx.send(outcome);
        });

        rx.await.map_err(|_| {
            AdminError::Internal("Settings writer task ended without a result".to_string())
        })?
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn get(&self) -> Settings {
        self.shared.current.read().await.clone()
    }

    async fn set(&self, settings: Settings) -> Result<(), AdminError> {
        settings.validate()?;
        self.commit(move |_| Ok(settings)).await?;
        Ok(())
    }

    async fn apply(
        &self,
        patch: SettingsPatch,
        expected_version: Option<&str>,
    ) -> Result<Settings, AdminError> {
        let expected = expected_version.map(str::to_string);
        self.commit(move |current| prepare(current, &patch, expected.as_deref()))
            .await
    }
}

/// In-memory settings store with the same write semantics, minus the disk.
/// Used by tests and by deployments that do not need durability.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    current: RwLock<Settings>,
    writer: Mutex<()>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            current: RwLock::new(settings),
            writer: Mutex::new(()),
        }
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get(&self) -> Settings {
        self.current.read().await.clone()
    }

    async fn set(&self, settings: Settings) -> Result<(), AdminError> {
        settings.validate()?;
        let _guard = self.writer.lock().await;
        *self.current.write().await = settings;
        Ok(())
    }

    async fn apply(
        &self,
        patch: SettingsPatch,
        expected_version: Option<&str>,
    ) -> Result<Settings, AdminError> {
        let _guard = self.writer.lock().await;
        let current = self.current.read().await.clone();
        let next = prepare(&current, &patch, expected_version)?;
        *self.current.write().await = next.clone();
        Ok(next)
    }
}

/// Version check, patch, and validation shared by both stores.
fn prepare(
    current: &Settings,
    patch: &SettingsPatch,
    expected_version: Option<&str>,
) -> Result<Settings, AdminError> {
    if let Some(expected) = expected_version {
        let actual = current.version();
        if expected != actual {
            return Err(AdminError::Validation(format!(
                "Settings version mismatch: expected {}, current {}",
                expected, actual
            )));
        }
    }
    let next = current.patched(patch);
    next.validate()?;
    Ok(next)
}

/// Atomically replace the document at `path` via temp file + rename.
async fn write_document(path: &Path, settings: &Settings) -> Result<(), AdminError> {
    let json = serde_json::to_vec_pretty(settings)
        .map_err(|e| AdminError::Internal(format!("Failed to serialize settings: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AdminError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
    }

    let tmp = temp_path(path);
    let io_err = |stage: &str, e: std::io::Error| {
        AdminError::Io(format!("Settings {} failed for {}: {}", stage, path.display(), e))
    };

    let mut file = tokio::fs::File::create(&tmp)
        .await
        .map_err(|e| io_err("create", e))?;
    file.write_all(&json).await.map_err(|e| io_err("write", e))?;
    file.sync_all().await.map_err(|e| io_err("fsync", e))?;
    drop(file);

    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        // Leave the previous document in place; drop the orphaned temp file.
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(io_err("rename", e));
    }

    tracing::debug!("Persisted settings to {}", path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "settings.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
