// ── Core error types ──
//
// User-facing errors from petadmin-core. Consumers never see HTTP status
// codes or JSON parse failures directly: the `From<petadmin_api::Error>`
// impl translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the registry at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("{message}")]
    ValidationFailed { message: String },

    #[error("Backend error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// The message a UI should show, or `None` when the error carries no
    /// meaningful text and a per-operation fallback should be used instead.
    pub fn display_message(&self) -> Option<String> {
        let bare = match self {
            Self::ValidationFailed { message }
            | Self::Api { message, .. }
            | Self::AuthenticationFailed { message }
            | Self::Config { message }
            | Self::Internal(message) => message.trim().is_empty(),
            _ => false,
        };
        if bare { None } else { Some(self.to_string()) }
    }

    /// Display message with a fallback for errors that carry none.
    pub fn message_or(&self, fallback: &str) -> String {
        self.display_message()
            .unwrap_or_else(|| fallback.to_owned())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<petadmin_api::Error> for CoreError {
    fn from(err: petadmin_api::Error) -> Self {
        use petadmin_api::Error as ApiError;

        match err {
            ApiError::Authentication { message } => CoreError::AuthenticationFailed { message },
            ApiError::SessionExpired => CoreError::AuthenticationFailed {
                message: "Session expired -- log in again".into(),
            },
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ApiError::NotFound { path } => CoreError::NotFound {
                entity_type: "Record".into(),
                identifier: path,
            },
            ApiError::Validation { message, .. } => CoreError::ValidationFailed { message },
            ApiError::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            ApiError::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Unexpected response from backend: {message}"))
            }
        }
    }
}
