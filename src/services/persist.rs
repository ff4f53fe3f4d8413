//! Durable session storage.
//!
//! DESIGN
//! ======
//! The session store writes through a `SessionStorage` trait so the durable
//! backend is swappable: a JSON file on disk for real deployments, an
//! in-memory record when no file is configured (sessions then die with the
//! process). The persisted record carries only the token and minimal user
//! fields; the expiry timestamp is re-derived from the token on load.
//!
//! ERROR HANDLING
//! ==============
//! An unreadable record loads as absent: a corrupt file means a clean
//! signed-out start, never a startup failure.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::services::session::SessionUser;

/// Serialized session record: token plus minimal user fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("session storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("session record encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable backing store for the single session record.
#[async_trait::async_trait]
pub trait SessionStorage: Send + Sync {
    async fn load(&self) -> Result<Option<PersistedSession>, PersistError>;
    async fn save(&self, record: &PersistedSession) -> Result<(), PersistError>;
    async fn clear(&self) -> Result<(), PersistError>;
}

// =============================================================================
// FILE STORAGE
// =============================================================================

/// JSON-file-backed storage.
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait::async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self) -> Result<Option<PersistedSession>, PersistError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "persisted session unreadable, ignoring");
                Ok(None)
            }
        }
    }

    async fn save(&self, record: &PersistedSession) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let raw = serde_json::to_vec_pretty(record)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), PersistError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// MEMORY STORAGE
// =============================================================================

/// Process-lifetime storage, used when no session file is configured.
#[derive(Default)]
pub struct MemorySessionStorage {
    record: std::sync::Mutex<Option<PersistedSession>>,
}

impl MemorySessionStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn load(&self) -> Result<Option<PersistedSession>, PersistError> {
        Ok(self
            .record
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone())
    }

    async fn save(&self, record: &PersistedSession) -> Result<(), PersistError> {
        *self
            .record
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(record.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), PersistError> {
        *self
            .record
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "persist_test.rs"]
mod tests;
