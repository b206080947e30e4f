use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Unknown preference '{name}'")]
    UnknownPreference { name: String },

    #[error("Malformed value for '{name}': {reason}")]
    MalformedPreference { name: String, reason: String },

    #[error("Reader lookup failed for tab {tab_id}: {reason}")]
    LookupFailed { tab_id: String, reason: String },

    #[error("Message too large: {len} bytes (max: {max} bytes)")]
    MessageTooLarge { len: usize, max: usize },

    #[error("Truncated message: expected {len} bytes")]
    TruncatedFrame { len: usize },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// True when the peer closed the stream between messages.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, AppError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}
