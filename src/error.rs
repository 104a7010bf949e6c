/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Whether the failure came from talking to the movie database
    /// (as opposed to bad input on our side)
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            AppError::HttpClient(_) | AppError::ExternalApi(_) | AppError::Decode(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
