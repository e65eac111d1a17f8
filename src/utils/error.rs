use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store not supported: {store}")]
    UnsupportedStore { store: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Parsing error: {message}")]
    Parse { message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Too many tracked items (limit is {max})")]
    Capacity { max: usize },

    #[error("No tracked item at position {position} ({len} tracked)")]
    Range { position: usize, len: usize },

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn parse(message: impl Into<String>) -> Self {
        AppError::Parse { message: message.into() }
    }

    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Fetch { url: url.into(), message: message.into() }
    }

    /// Errors a monitoring round tolerates: the item keeps its stale state.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(self, AppError::Fetch { .. } | AppError::Parse { .. })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::parse(format!("invalid embedded JSON: {}", err))
    }
}

impl From<rust_decimal::Error> for AppError {
    fn from(err: rust_decimal::Error) -> Self {
        AppError::parse(format!("invalid decimal: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
