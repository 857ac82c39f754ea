//! Error types for the nutrition profile wizard.

use serde::Serialize;

/// PostgREST error code returned when a single-row select matches nothing.
pub const NO_ROWS_CODE: &str = "PGRST116";

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Durable local cache errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Failed to open cache: {0}")]
    Open(String),

    #[error("Cache query failed: {0}")]
    Query(String),

    #[error("Cache serialization error: {0}")]
    Serialization(String),
}

/// Errors reported by the remote profile collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("{message} (code {code})")]
    Api { code: String, message: String },

    #[error("Transport failure: {0}")]
    Transport(String),
}

impl RemoteError {
    /// The "no rows" error a single-row select returns for an unknown id.
    pub fn no_rows(id: &str) -> Self {
        Self::Api {
            code: NO_ROWS_CODE.to_string(),
            message: format!("No profile row for id {id}"),
        }
    }

    /// Whether this error only means the record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { code, .. } if code == NO_ROWS_CODE)
    }

    /// Human-readable message, without the error code.
    pub fn message(&self) -> &str {
        match self {
            Self::Api { message, .. } => message,
            Self::Transport(message) => message,
        }
    }
}

/// Errors reported by the auth collaborator.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Identity lookup failed: {0}")]
    Lookup(String),
}

/// Structured failure of a remote synchronization.
///
/// Returned as a value by the profile store; never escalated to the wizard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("User not authenticated")]
    NotAuthenticated,

    #[error("No profile to save")]
    NoProfile,

    #[error("Identity lookup failed: {0}")]
    Identity(String),

    #[error("{0}")]
    Remote(String),
}

/// Outcome of a remote synchronization.
pub type SyncResult = std::result::Result<(), SyncError>;

/// `{ success, error }` view of a [`SyncResult`] for callers that surface it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&SyncResult> for SyncReport {
    fn from(result: &SyncResult) -> Self {
        match result {
            Ok(()) => Self {
                success: true,
                error: None,
            },
            Err(e) => Self {
                success: false,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Wizard configuration and input routing errors.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Step catalog is empty")]
    EmptyCatalog,

    #[error("Step catalog lists {key} more than once")]
    DuplicateStep { key: String },

    #[error("Step {step} ({kind}) does not accept {input} input")]
    InputMismatch {
        step: String,
        kind: String,
        input: String,
    },
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rows_is_not_found() {
        let err = RemoteError::no_rows("user-1");
        assert!(err.is_not_found());
        assert!(err.message().contains("user-1"));
    }

    #[test]
    fn other_codes_are_real_failures() {
        let err = RemoteError::Api {
            code: "42501".to_string(),
            message: "permission denied for table profiles".to_string(),
        };
        assert!(!err.is_not_found());
        assert_eq!(err.message(), "permission denied for table profiles");
        assert!(!RemoteError::Transport("connection reset".to_string()).is_not_found());
    }

    #[test]
    fn startup_errors_convert_into_top_level_error() {
        fn load(ok: bool) -> Result<u16> {
            if !ok {
                Err(ConfigError::InvalidValue {
                    key: "NUTRI_PROFILE_PORT".to_string(),
                    message: "not a number".to_string(),
                })?;
            }
            Ok(3000)
        }
        fn open() -> Result<()> {
            Err(CacheError::Open("unable to open database file".to_string()))?
        }

        assert_eq!(load(true).unwrap(), 3000);
        let err = load(false).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid configuration value for NUTRI_PROFILE_PORT: not a number"
        );

        let err = open().unwrap_err();
        assert!(matches!(err, Error::Cache(CacheError::Open(_))));
        assert!(err.to_string().starts_with("Cache error: Failed to open cache"));
    }

    #[test]
    fn sync_report_from_result() {
        let ok: SyncResult = Ok(());
        assert_eq!(
            SyncReport::from(&ok),
            SyncReport {
                success: true,
                error: None
            }
        );

        let failed: SyncResult = Err(SyncError::NotAuthenticated);
        let report = SyncReport::from(&failed);
        assert!(!report.success);
        assert_eq!(report.error.as_deref(), Some("User not authenticated"));

        let json = serde_json::to_value(SyncReport::from(&ok)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true}));
    }
}
