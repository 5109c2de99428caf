//! Error types for connref operations.
//!
//! Errors fall into three groups that drive how callers react:
//!
//! - **Remote failures** (`Remote`, `Http`): a single API call failed. Callers
//!   that mutate remote state catch these at the call site, log the status and
//!   body, bump an error counter and keep going.
//! - **Setup failures** (`ConfigNotFound`, `Config`, `Auth`): the run cannot start. These reach
//!   `main` and terminate the process with a non-zero status.
//! - **Data failures** (`Json`, `ClientData`, `Io`): malformed payloads or
//!   local file problems.
//!
//! # Error Codes
//!
//! - E001-E009: remote/HTTP errors
//! - E010-E019: payload and client data errors
//! - E020-E029: configuration errors
//! - E030-E039: authentication errors
//! - E040-E049: local I/O errors

use std::path::PathBuf;

/// Structured error code for documentation and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// Remote API returned a non-success status
    pub const REMOTE_STATUS: ErrorCode = ErrorCode("E001");
    /// Request could not be sent or the response could not be read
    pub const REMOTE_TRANSPORT: ErrorCode = ErrorCode("E002");

    /// Payload was not valid JSON
    pub const PAYLOAD_JSON: ErrorCode = ErrorCode("E010");
    /// Workflow client data could not be interpreted
    pub const CLIENT_DATA: ErrorCode = ErrorCode("E011");

    /// Configuration error - generic
    pub const CONFIG_INVALID: ErrorCode = ErrorCode("E020");
    /// Configuration error - file not found
    pub const CONFIG_FILE_NOT_FOUND: ErrorCode = ErrorCode("E022");

    /// Token acquisition failed
    pub const AUTH_FAILED: ErrorCode = ErrorCode("E030");

    /// Local I/O error
    pub const IO_GENERIC: ErrorCode = ErrorCode("E049");

    /// Get the error code string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unified error type for connref operations.
#[derive(Debug, thiserror::Error)]
pub enum ConnRefError {
    /// The remote API answered with a non-success status.
    #[error("remote request failed with status {status}: {body}")]
    Remote { status: u16, body: String },

    /// The request never produced a response (connection, TLS, timeout).
    #[error("HTTP transport error: {0}")]
    Http(String),

    /// A response or document was not valid JSON for the expected shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Workflow client data could not be interpreted.
    #[error("invalid client data for workflow '{workflow}': {message}")]
    ClientData { workflow: String, message: String },

    /// No configuration file at the given or searched location.
    #[error("configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Configuration is invalid.
    #[error("configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Access token could not be acquired.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Local file system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConnRefError {
    /// Create a remote status error.
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::Remote {
            status,
            body: body.into(),
        }
    }

    /// Create a configuration error without file context.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error tied to a file.
    pub fn config_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Get the structured error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Remote { .. } => ErrorCode::REMOTE_STATUS,
            Self::Http(_) => ErrorCode::REMOTE_TRANSPORT,
            Self::Json(_) => ErrorCode::PAYLOAD_JSON,
            Self::ClientData { .. } => ErrorCode::CLIENT_DATA,
            Self::ConfigNotFound { .. } => ErrorCode::CONFIG_FILE_NOT_FOUND,
            Self::Config { .. } => ErrorCode::CONFIG_INVALID,
            Self::Auth(_) => ErrorCode::AUTH_FAILED,
            Self::Io(_) => ErrorCode::IO_GENERIC,
        }
    }

    /// HTTP status of a remote failure, if this is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the user can fix this error by changing input or configuration.
    #[must_use]
    pub fn is_user_fixable(&self) -> bool {
        match self {
            Self::ConfigNotFound { .. } | Self::Config { .. } | Self::Auth(_) => true,
            Self::Remote { status, .. } => matches!(status, 400 | 401 | 403 | 404),
            Self::Http(_) | Self::Json(_) | Self::ClientData { .. } | Self::Io(_) => false,
        }
    }

    /// What to try next, for errors the user can fix.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        if !self.is_user_fixable() {
            return None;
        }
        Some(match self {
            Self::ConfigNotFound { .. } => {
                "run `connref init` to create .connref.toml, or pass --config <path>"
            }
            Self::Config { .. } => "correct the listed settings in .connref.toml",
            Self::Auth(_) => {
                "check the credentials in .connref.toml or CONNREF_CLIENT_SECRET / CONNREF_ACCESS_TOKEN"
            }
            _ => "check the solution name and the permissions of the signed-in account",
        })
    }
}

pub type Result<T> = std::result::Result<T, ConnRefError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display_includes_status_and_body() {
        let err = ConnRefError::remote(400, "{\"error\":\"bad\"}");
        assert_eq!(
            err.to_string(),
            "remote request failed with status 400: {\"error\":\"bad\"}"
        );
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.code(), ErrorCode::REMOTE_STATUS);
    }

    #[test]
    fn test_config_not_found_code() {
        let err = ConnRefError::ConfigNotFound {
            path: PathBuf::from("/tmp/.connref.toml"),
        };
        assert_eq!(err.code(), ErrorCode::CONFIG_FILE_NOT_FOUND);
        assert_eq!(
            err.to_string(),
            "configuration file not found: /tmp/.connref.toml"
        );

        let err = ConnRefError::config("prefix must not be empty");
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID);
    }

    #[test]
    fn test_not_found_wording_in_other_config_errors_is_not_file_not_found() {
        let err = ConnRefError::config_with_path(
            "invalid configuration:\n  - mapping for provider 'x' not found",
            "/tmp/.connref.toml",
        );
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID);
    }

    #[test]
    fn test_hint_only_for_user_fixable_errors() {
        let missing = ConnRefError::ConfigNotFound {
            path: PathBuf::from(".connref.toml"),
        };
        assert!(missing.is_user_fixable());
        assert!(missing.hint().unwrap().contains("connref init"));
        assert!(ConnRefError::Auth("denied".into()).hint().is_some());
        assert!(ConnRefError::remote(404, "").hint().is_some());
        assert_eq!(ConnRefError::remote(503, "").hint(), None);
        assert_eq!(ConnRefError::Http("timeout".into()).hint(), None);
    }

    #[test]
    fn test_user_fixable_classification() {
        assert!(ConnRefError::config("x").is_user_fixable());
        assert!(ConnRefError::Auth("denied".into()).is_user_fixable());
        assert!(ConnRefError::remote(403, "").is_user_fixable());
        assert!(!ConnRefError::remote(503, "").is_user_fixable());
        assert!(!ConnRefError::Http("timeout".into()).is_user_fixable());
    }

    #[test]
    fn test_json_error_converts() {
        let err: ConnRefError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), ErrorCode::PAYLOAD_JSON);
        assert_eq!(err.status(), None);
    }
}
