//! Collaborator seams for the profile store.
//!
//! The store never talks to storage or auth directly; it goes through these
//! traits, held as `Arc<dyn Trait>` so tests can swap in stubs.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::{AuthError, CacheError, RemoteError};

/// Durable key/value slot holding the serialized profile.
#[async_trait]
pub trait LocalCache: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn read(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError>;

    /// Overwrite the value stored under `key`.
    async fn write(&self, key: &str, value: &serde_json::Value) -> Result<(), CacheError>;

    /// Remove `key`. Returns whether anything was removed.
    async fn remove(&self, key: &str) -> Result<bool, CacheError>;
}

/// Remote profile table, addressed by profile `id`.
#[async_trait]
pub trait RemoteProfiles: Send + Sync {
    /// Insert or replace the record whose `id` matches `record["id"]`.
    async fn upsert(&self, record: &serde_json::Value) -> Result<(), RemoteError>;

    /// Fetch exactly one record by `id`.
    ///
    /// An unknown id is an error carrying the "no rows" code, see
    /// [`RemoteError::is_not_found`].
    async fn select_one(&self, id: &str) -> Result<serde_json::Value, RemoteError>;
}

/// Auth session change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { user_id: String },
    SignedOut,
}

/// Source of the current authenticated identity.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The signed-in user id, or `None` when anonymous.
    async fn current_identity(&self) -> Result<Option<String>, AuthError>;

    /// Subscribe to session changes.
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}
