//! ProfileStore — owns the in-memory profile, its local cache slot, and the
//! remote submission path.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};
use crate::profile::{FieldUpdate, NutritionProfile};

use super::traits::{AuthProvider, LocalCache, RemoteProfiles};

/// Single owner of the user's [`NutritionProfile`].
///
/// Every mutation holds the write lock until the cache write-through has
/// finished, so updates reach the cache in the order they were issued.
pub struct ProfileStore {
    cache: Arc<dyn LocalCache>,
    remote: Arc<dyn RemoteProfiles>,
    auth: Arc<dyn AuthProvider>,
    cache_key: String,
    profile: RwLock<Option<NutritionProfile>>,
}

impl ProfileStore {
    /// A store with no profile. Does not read the cache.
    pub fn new(
        cache: Arc<dyn LocalCache>,
        remote: Arc<dyn RemoteProfiles>,
        auth: Arc<dyn AuthProvider>,
        cache_key: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            remote,
            auth,
            cache_key: cache_key.into(),
            profile: RwLock::new(None),
        }
    }

    /// A store restored from the cache slot, read once.
    ///
    /// An unreadable or undecodable slot is logged and treated as empty.
    pub async fn open(
        cache: Arc<dyn LocalCache>,
        remote: Arc<dyn RemoteProfiles>,
        auth: Arc<dyn AuthProvider>,
        cache_key: impl Into<String>,
    ) -> Self {
        let store = Self::new(cache, remote, auth, cache_key);
        let restored = match store.cache.read(&store.cache_key).await {
            Ok(Some(value)) => match serde_json::from_value::<NutritionProfile>(value) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!(key = %store.cache_key, "Discarding undecodable cached profile: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = %store.cache_key, "Failed to read cached profile: {}", e);
                None
            }
        };
        if restored.is_some() {
            info!(key = %store.cache_key, "Restored profile from local cache");
        }
        *store.profile.write().await = restored;
        store
    }

    /// Current profile, if any.
    pub async fn profile(&self) -> Option<NutritionProfile> {
        self.profile.read().await.clone()
    }

    /// Current profile, or a fresh unset one when none exists yet.
    pub async fn snapshot_or_default(&self) -> NutritionProfile {
        self.profile
            .read()
            .await
            .clone()
            .unwrap_or_else(NutritionProfile::new)
    }

    /// Apply one field update and write the result through to the cache.
    ///
    /// Creates the profile on first use. Never fails; cache errors are logged.
    pub async fn update_field(&self, update: FieldUpdate) -> NutritionProfile {
        self.update_with(|_| update).await
    }

    /// Compute an update from the current profile and apply it, atomically.
    ///
    /// Used for read-modify-write edits such as toggling a set member.
    pub async fn update_with<F>(&self, build: F) -> NutritionProfile
    where
        F: FnOnce(&NutritionProfile) -> FieldUpdate,
    {
        let mut guard = self.profile.write().await;
        let profile = guard.get_or_insert_with(NutritionProfile::new);
        let update = build(profile);
        debug!(field = %update.field(), "Profile field updated");
        profile.apply(update);
        profile.touch();

        let snapshot = profile.clone();
        self.persist(&snapshot).await;
        snapshot
    }

    /// Drop the profile and its cache entry.
    pub async fn reset(&self) {
        let mut guard = self.profile.write().await;
        *guard = None;
        if let Err(e) = self.cache.remove(&self.cache_key).await {
            warn!(key = %self.cache_key, "Failed to remove cached profile: {}", e);
        }
        info!("Profile reset");
    }

    /// Whether an identity is currently signed in.
    pub async fn is_authenticated(&self) -> bool {
        match self.auth.current_identity().await {
            Ok(identity) => identity.is_some(),
            Err(e) => {
                warn!("Identity lookup failed: {}", e);
                false
            }
        }
    }

    /// Upsert `profile` remotely under the signed-in identity.
    ///
    /// On success the in-memory profile becomes the submitted one, carrying
    /// `id`. On failure nothing local changes.
    pub async fn submit_remote(
        &self,
        mut profile: NutritionProfile,
        warn_if_anonymous: bool,
    ) -> SyncResult {
        let user_id = self.identity(warn_if_anonymous).await?;

        profile.id = Some(user_id.clone());
        profile.created_at.get_or_insert_with(Utc::now);
        profile.touch();

        let record =
            serde_json::to_value(&profile).map_err(|e| SyncError::Remote(e.to_string()))?;
        if let Err(e) = self.remote.upsert(&record).await {
            warn!(user_id = %user_id, "Remote profile upsert failed: {}", e);
            return Err(SyncError::Remote(e.message().to_string()));
        }

        let mut guard = self.profile.write().await;
        *guard = Some(profile.clone());
        self.persist(&profile).await;
        info!(user_id = %user_id, "Profile synced to remote");
        Ok(())
    }

    /// Submit whatever profile the store currently holds.
    pub async fn sync_current(&self, warn_if_anonymous: bool) -> SyncResult {
        let profile = self.profile().await.ok_or(SyncError::NoProfile)?;
        self.submit_remote(profile, warn_if_anonymous).await
    }

    /// Replace the local profile with the remote record for the signed-in user.
    ///
    /// A missing record is a first-time user: success, nothing changes.
    pub async fn load_remote(&self) -> SyncResult {
        let user_id = self.identity(false).await?;

        let record = match self.remote.select_one(&user_id).await {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                debug!(user_id = %user_id, "No remote profile yet");
                return Ok(());
            }
            Err(e) => {
                warn!(user_id = %user_id, "Remote profile fetch failed: {}", e);
                return Err(SyncError::Remote(e.message().to_string()));
            }
        };

        let profile: NutritionProfile =
            serde_json::from_value(record).map_err(|e| SyncError::Remote(e.to_string()))?;

        let mut guard = self.profile.write().await;
        *guard = Some(profile.clone());
        self.persist(&profile).await;
        info!(user_id = %user_id, "Profile loaded from remote");
        Ok(())
    }

    async fn identity(&self, warn_if_anonymous: bool) -> Result<String, SyncError> {
        match self.auth.current_identity().await {
            Ok(Some(user_id)) => Ok(user_id),
            Ok(None) => {
                if warn_if_anonymous {
                    warn!("Profile sync skipped: user not authenticated");
                }
                Err(SyncError::NotAuthenticated)
            }
            Err(e) => Err(SyncError::Identity(e.to_string())),
        }
    }

    /// Write-through to the cache slot. Callers hold the profile write lock.
    async fn persist(&self, profile: &NutritionProfile) {
        let value = match serde_json::to_value(profile) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to serialize profile: {}", e);
                return;
            }
        };
        if let Err(e) = self.cache.write(&self.cache_key, &value).await {
            warn!(key = %self.cache_key, "Failed to persist profile: {}", e);
        }
    }
}
