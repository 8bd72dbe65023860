use thiserror::Error;

/// Fallback text shown when a failure carries no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Unified error type for the entire stock-dashboard-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    // ── API / Network ───────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Forms / Business Logic ──────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(String),

    // ── Session ─────────────────────────────────────────────────────
    #[error("No user session")]
    NoSession,

    #[error("Invalid session: {0}")]
    InvalidSession(String),

    // ── Storage / Config ────────────────────────────────────────────
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CoreError {
    /// The message a user should see for this error.
    ///
    /// Server-provided and validation messages are passed through verbatim;
    /// transport and parsing failures collapse to a generic fallback.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            CoreError::Validation(message) => message.clone(),
            CoreError::NoSession => "User ID is undefined. Please log in again.".to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// `true` for failures that happened before any request was sent.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Query strings may carry usernames or ids; keep them out of logs and messages.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        if e.is_decode() {
            CoreError::Deserialization(sanitized)
        } else {
            CoreError::Network(sanitized)
        }
    }
}
