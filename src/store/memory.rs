//! In-process collaborators: a volatile cache, a remote profile table, and an
//! auth session that broadcasts sign-in/sign-out.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info};

use crate::error::{AuthError, CacheError, RemoteError};

use super::traits::{AuthProvider, LocalCache, RemoteProfiles, SessionEvent};

/// Volatile [`LocalCache`]. Contents are lost when dropped.
#[derive(Default)]
pub struct MemoryCache {
    slots: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalCache for MemoryCache {
    async fn read(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError> {
        Ok(self.slots.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &serde_json::Value) -> Result<(), CacheError> {
        self.slots
            .write()
            .await
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.slots.write().await.remove(key).is_some())
    }
}

/// In-process [`RemoteProfiles`] table keyed by `id`.
///
/// Unknown ids answer with the PostgREST "no rows" error, like the hosted table.
#[derive(Default)]
pub struct MemoryRemote {
    rows: RwLock<HashMap<String, serde_json::Value>>,
    upserts: AtomicUsize,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of upserts received so far.
    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    /// Stored record for `id`, without the not-found error.
    pub async fn row(&self, id: &str) -> Option<serde_json::Value> {
        self.rows.read().await.get(id).cloned()
    }
}

#[async_trait]
impl RemoteProfiles for MemoryRemote {
    async fn upsert(&self, record: &serde_json::Value) -> Result<(), RemoteError> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        let id = record
            .get("id")
            .and_then(|v| v.as_str())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| RemoteError::Api {
                code: "23502".to_string(),
                message: "null value in column \"id\" violates not-null constraint".to_string(),
            })?;

        debug!(id, "Remote upsert");
        self.rows
            .write()
            .await
            .insert(id.to_string(), record.clone());
        Ok(())
    }

    async fn select_one(&self, id: &str) -> Result<serde_json::Value, RemoteError> {
        self.rows
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RemoteError::no_rows(id))
    }
}

/// In-process auth session.
///
/// Holds at most one signed-in user and broadcasts every change.
pub struct SessionAuth {
    user_id: RwLock<Option<String>>,
    tx: broadcast::Sender<SessionEvent>,
}

impl Default for SessionAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionAuth {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self {
            user_id: RwLock::new(None),
            tx,
        }
    }

    pub async fn sign_in(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        *self.user_id.write().await = Some(user_id.clone());
        info!(user_id = %user_id, "Signed in");
        // No subscribers is fine.
        let _ = self.tx.send(SessionEvent::SignedIn { user_id });
    }

    pub async fn sign_out(&self) {
        let previous = self.user_id.write().await.take();
        if previous.is_some() {
            info!("Signed out");
            let _ = self.tx.send(SessionEvent::SignedOut);
        }
    }
}

#[async_trait]
impl AuthProvider for SessionAuth {
    async fn current_identity(&self) -> Result<Option<String>, AuthError> {
        Ok(self.user_id.read().await.clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }
}
