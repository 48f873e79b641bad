//! Error types for the issue tracker.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes for the CLI (4=validation, 3=not_found, 7=config, ...)
//! - The exact `{error, _id}` response bodies the HTTP API answers with
//! - Structured JSON output for piped / non-TTY consumers of the CLI

use serde_json::Value;
use thiserror::Error;

/// Result type alias for issue tracker operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Clients match on the string; shell scripts on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (exit 4)
    RequiredField,
    MissingId,
    NoUpdateFields,
    InvalidBody,

    // Not Found (exit 3)
    IssueNotFound,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::RequiredField => "REQUIRED_FIELD",
            Self::MissingId => "MISSING_ID",
            Self::NoUpdateFields => "NO_UPDATE_FIELDS",
            Self::InvalidBody => "INVALID_BODY",
            Self::IssueNotFound => "ISSUE_NOT_FOUND",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::IssueNotFound => 3,
            Self::RequiredField | Self::MissingId | Self::NoUpdateFields | Self::InvalidBody => 4,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether a client should retry with corrected input.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RequiredField | Self::MissingId | Self::NoUpdateFields | Self::InvalidBody
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in issue tracker operations.
///
/// The display strings of the request-level variants are part of the wire
/// contract: they are sent verbatim as the `error` field of response bodies.
#[derive(Error, Debug)]
pub enum Error {
    #[error("required field(s) missing")]
    RequiredFieldsMissing,

    #[error("missing _id")]
    MissingId,

    /// `id` is echoed back exactly as the client sent it.
    #[error("no update field(s) sent")]
    NoUpdateFields { id: Value },

    #[error("could not update")]
    CouldNotUpdate { id: Value },

    #[error("could not delete")]
    CouldNotDelete { id: Value },

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::RequiredFieldsMissing => ErrorCode::RequiredField,
            Self::MissingId => ErrorCode::MissingId,
            Self::NoUpdateFields { .. } => ErrorCode::NoUpdateFields,
            Self::CouldNotUpdate { .. } | Self::CouldNotDelete { .. } => ErrorCode::IssueNotFound,
            Self::InvalidBody(_) => ErrorCode::InvalidBody,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// The client-supplied `_id` this error refers to, if any.
    #[must_use]
    pub const fn id(&self) -> Option<&Value> {
        match self {
            Self::NoUpdateFields { id } | Self::CouldNotUpdate { id } | Self::CouldNotDelete { id } => {
                Some(id)
            }
            _ => None,
        }
    }

    /// Whether this error is answered in-band (HTTP 200 with an error body)
    /// rather than as a transport-level failure.
    #[must_use]
    pub const fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::RequiredFieldsMissing
                | Self::MissingId
                | Self::NoUpdateFields { .. }
                | Self::CouldNotUpdate { .. }
                | Self::CouldNotDelete { .. }
        )
    }

    /// Response body for the HTTP API: `{error}` or `{error, _id}`.
    #[must_use]
    pub fn to_body(&self) -> Value {
        let mut body = serde_json::json!({ "error": self.to_string() });
        if let Some(id) = self.id() {
            body["_id"] = id.clone();
        }
        body
    }

    /// Context-aware recovery hint for operators.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Config(msg) if msg.contains("bind") || msg.contains("PORT") => Some(
                "Use `--bind HOST:PORT`, ISSUETRACKER_BIND_ADDR=HOST:PORT or PORT=<number>"
                    .to_string(),
            ),
            Self::Io(e) if e.kind() == std::io::ErrorKind::AddrInUse => Some(
                "Another process is listening on that address. Pick another with `--bind`."
                    .to_string(),
            ),
            _ => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = Value::String(hint);
        }

        obj
    }
}
