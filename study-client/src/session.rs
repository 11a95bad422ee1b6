//! Device storage for session state and settings.
//!
//! Three fixed keys mirror the in-memory session to device storage: the
//! bearer token, the last-known user profile, and the settings blob. The
//! persisted values are consumed only at process start, to pre-populate
//! state before the first network round-trip.
//!
//! Settings are merged into the existing blob, never written wholesale, so
//! keys from other app versions survive (see
//! [`merge_settings`](studyhall_core::merge_settings)).

use crate::cell::StoreCell;
use crate::context::AppContext;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use studyhall_core::merge_settings;
use studyhall_types::{Settings, UserProfile};

/// Storage key for the settings JSON blob.
pub const SETTINGS_KEY: &str = "studyhall.settings";

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "studyhall.token";

/// Storage key for the last-known user profile (JSON).
pub const PROFILE_KEY: &str = "studyhall.profile";

/// Storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The underlying store could not be read or written.
    #[error("storage I/O failed: {0}")]
    Io(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Key-value device storage for small string blobs.
///
/// The app binds this to platform storage; tests use [`MemoryStorage`].
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Read the value under `key`, if present.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any existing value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Deleting a missing key is a no-op.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage for tests and ephemeral sessions.
///
/// Clones share state.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clone for MemoryStorage {
    fn clone(&self) -> Self {
        Self {
            values: Arc::clone(&self.values),
        }
    }
}

#[async_trait]
impl StoragePort for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

/// File-backed storage: one file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at the given directory. The directory is created on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

#[async_trait]
impl StoragePort for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path_for(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Pre-populate session and settings state from device storage.
///
/// Called once at process start, before any screen mounts. Values that do
/// not parse (corrupted storage, format drift across versions) are skipped
/// with a warning rather than failing startup.
pub async fn restore_session(
    ctx: &AppContext,
    storage: &dyn StoragePort,
) -> Result<(), StorageError> {
    if let Some(token) = storage.get(TOKEN_KEY).await? {
        ctx.session.mutate(|session| session.set_token(token));
    }

    if let Some(raw) = storage.get(PROFILE_KEY).await? {
        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) => {
                ctx.session.mutate(|session| session.set_profile(profile));
            }
            Err(err) => {
                tracing::warn!(error = %err, "stored profile did not parse, skipping");
            }
        }
    }

    if let Some(raw) = storage.get(SETTINGS_KEY).await? {
        match serde_json::from_str::<Settings>(&raw) {
            Ok(settings) => {
                ctx.settings.mutate(|current| *current = settings);
            }
            Err(err) => {
                tracing::warn!(error = %err, "stored settings did not parse, keeping defaults");
            }
        }
    }

    Ok(())
}

/// Persist the current settings, merged into the existing blob.
pub async fn persist_settings(
    settings: &StoreCell<Settings>,
    storage: &dyn StoragePort,
) -> Result<(), StorageError> {
    let existing = match storage.get(SETTINGS_KEY).await? {
        Some(raw) => serde_json::from_str(&raw).unwrap_or(serde_json::Value::Null),
        None => serde_json::Value::Null,
    };
    let snapshot = settings.read(|s| s.clone());
    let merged = merge_settings(existing, &snapshot);
    storage.set(SETTINGS_KEY, &merged.to_string()).await
}

/// Clear all persisted session keys. Settings survive logout.
pub async fn clear_persisted_session(storage: &dyn StoragePort) -> Result<(), StorageError> {
    storage.remove(TOKEN_KEY).await?;
    storage.remove(PROFILE_KEY).await?;
    Ok(())
}
