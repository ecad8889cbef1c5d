use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("content parsing error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no usable items in {what}")]
    EmptyData { what: String },
    #[error("invalid content url: {0}")]
    Url(#[from] url::ParseError),
}

impl ContentError {
    /// Whether another language may still have the document.
    pub fn is_recoverable_by_fallback(&self) -> bool {
        !matches!(self, ContentError::Url(_))
    }
}

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference store is not valid JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
    #[error("configuration I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
