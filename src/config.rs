//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Wizard service configuration.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Path of the libSQL file backing the local profile cache.
    pub db_path: PathBuf,
    /// Namespace of the single cache slot holding the profile.
    pub cache_key: String,
    /// HTTP port for the wizard API.
    pub port: u16,
    /// Identity signed in at startup, if any.
    pub user_id: Option<String>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/nutri-profile.db"),
            cache_key: "user_profile".to_string(),
            port: 8080,
            user_id: None,
        }
    }
}

impl WizardConfig {
    /// Build a configuration from `NUTRI_PROFILE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let db_path = lookup("NUTRI_PROFILE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let cache_key = match lookup("NUTRI_PROFILE_CACHE_KEY") {
            Some(key) if key.trim().is_empty() => {
                return Err(ConfigError::InvalidValue {
                    key: "NUTRI_PROFILE_CACHE_KEY".to_string(),
                    message: "must not be blank".to_string(),
                });
            }
            Some(key) => key,
            None => defaults.cache_key,
        };

        let port = match lookup("NUTRI_PROFILE_PORT") {
            Some(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
                key: "NUTRI_PROFILE_PORT".to_string(),
                message: format!("{raw:?}: {e}"),
            })?,
            None => defaults.port,
        };

        let user_id = lookup("NUTRI_PROFILE_USER_ID").filter(|id| !id.trim().is_empty());

        Ok(Self {
            db_path,
            cache_key,
            port,
            user_id,
        })
    }
}
