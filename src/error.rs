use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A directory listing could not be produced.
    #[error("Failed to list {identity}: {source}")]
    Listing {
        identity: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("Config error: {0}")]
    Config(String),

    /// Output serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal event channel was closed.
    #[error("Channel error: {0}")]
    Channel(String),
}

impl AppError {
    /// Wrap an I/O error raised while listing `identity`.
    pub fn listing(identity: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Listing {
            identity: identity.into(),
            source,
        }
    }
}
