use thiserror::Error;

/// Application-wide error types for Reel.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Every attempt for a discovery page failed.
    #[error("Failed to get data for page {page} after {attempts} attempts")]
    PageFetchExhausted { page: u32, attempts: u32 },

    /// Detail endpoint answered with a non-success status.
    #[error("Failed to fetch movie details for ID {id}. HTTP Status: {status}")]
    DetailFetchFailed { id: u64, status: u16 },

    /// Box-office page could not be fetched.
    #[error("Failed to fetch box office page for {imdb_id}: {reason}")]
    BoxOfficeFetchFailed { imdb_id: String, reason: String },

    /// A document could not be interpreted.
    #[error("Parse failure: {0}")]
    ParseFailure(String),

    /// A stage needs a column the input table does not have.
    #[error("Missing required column: {0}")]
    MissingRequiredColumn(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl AppError {
    /// Returns true if this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkError(_) | AppError::Timeout(_) => true,
            AppError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            AppError::HttpError(msg) => {
                msg.contains("timeout") || msg.contains("connect") || msg.contains("reset")
            }
            _ => false,
        }
    }

    /// Returns true if this error aborts a whole stage rather than a single row.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AppError::PageFetchExhausted { .. }
                | AppError::MissingRequiredColumn(_)
                | AppError::Config(_)
                | AppError::Csv(_)
                | AppError::Io(_)
        )
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::HttpStatus { status, .. } => Some(*status),
            AppError::DetailFetchFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
