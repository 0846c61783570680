use thiserror::Error;

/// Top-level error type for tabwarden.
#[derive(Debug, Error)]
pub enum TabwardenError {
    /// Error from the persistent store.
    #[error("store error: {0}")]
    Store(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Error raised while delivering a notification.
    #[error("notify error: {0}")]
    Notify(String),

    /// Error from the tab registry event source.
    #[error("registry error: {0}")]
    Registry(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
