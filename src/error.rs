//! Error types for fabric-wall
//!
//! `WallError` covers configuration, templates and report persistence.
//! `ApiError` covers every call into an external system and is the value
//! a check converts into a failed result.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fabric-wall operations
pub type WallResult<T> = Result<T, WallError>;

/// Main error type for configuration, templating and report I/O
#[derive(Error, Debug)]
pub enum WallError {
    /// Config file exists but is not valid TOML for our schema
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Config file given explicitly on the command line does not exist
    #[error("configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// A parameter the run cannot start without
    #[error("missing required parameter '{name}' (set it in the config file or pass --{flag})")]
    MissingParameter { name: String, flag: String },

    /// Template still contains placeholders nobody supplied
    #[error("unresolved placeholders in {template}: {}", .missing.join(", "))]
    UnresolvedPlaceholders {
        template: String,
        missing: Vec<String>,
    },

    /// Identifier rejected before being substituted into SQL
    #[error("invalid identifier '{value}' for {name}")]
    InvalidIdentifier { name: String, value: String },

    /// Config value outside the accepted set
    #[error("invalid value '{value}' for {key} (expected {expected})")]
    InvalidSetting {
        key: String,
        value: String,
        expected: String,
    },

    /// A mutating platform call failed; provisioning stops here
    #[error("{context}: {source}")]
    Api {
        context: String,
        #[source]
        source: ApiError,
    },

    /// Unknown bundled template name
    #[error("unknown template '{name}'")]
    UnknownTemplate { name: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization error
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Failure of a single call into the platform, the BI service or the SQL endpoint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No bearer token available for the call
    #[error("ACCESS_TOKEN is not set")]
    MissingToken,

    /// HTTP 403: token lacks scope or principal lacks permission
    #[error("Access denied (403): {body}")]
    Forbidden { body: String },

    /// HTTP 404
    #[error("Not found (404): {body}")]
    NotFound { body: String },

    /// HTTP 409 (used by provisioning to detect existing resources)
    #[error("Conflict (409): {body}")]
    Conflict { body: String },

    /// Any other non-2xx status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection, TLS or timeout failure
    #[error("request failed: {0}")]
    Transport(String),

    /// Response body did not match the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),

    /// SQL endpoint failure
    #[error("SQL error: {0}")]
    Sql(String),
}

impl ApiError {
    /// Classify an HTTP status and body into an error
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            403 => ApiError::Forbidden { body },
            404 => ApiError::NotFound { body },
            409 => ApiError::Conflict { body },
            _ => ApiError::Status { status, body },
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_parameter() {
        let err = WallError::MissingParameter {
            name: "provider_workspace_id".to_string(),
            flag: "provider-workspace".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "missing required parameter 'provider_workspace_id' (set it in the config file or pass --provider-workspace)"
        );
    }

    #[test]
    fn test_error_display_unresolved_placeholders() {
        let err = WallError::UnresolvedPlaceholders {
            template: "roles.json".to_string(),
            missing: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(err.to_string(), "unresolved placeholders in roles.json: A, B");
    }

    #[test]
    fn from_status_classifies_403_separately() {
        let err = ApiError::from_status(403, "InsufficientScopes");
        assert!(matches!(err, ApiError::Forbidden { .. }));
        assert!(err.to_string().starts_with("Access denied"));
    }

    #[test]
    fn from_status_keeps_other_codes() {
        assert_eq!(
            ApiError::from_status(500, "boom"),
            ApiError::Status {
                status: 500,
                body: "boom".to_string()
            }
        );
        assert!(ApiError::from_status(409, "exists").is_conflict());
    }
}
