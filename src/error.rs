use thiserror::Error;

/// Main error type for the trading bot
#[derive(Error, Debug)]
pub enum GambitError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Credential error: {0}")]
    Credentials(String),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    // Exchange rejections (non-2xx with an error payload)
    #[error("Exchange error: {0}")]
    Exchange(String),

    // Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    // Crypto/signing errors
    #[error("Signature error: {0}")]
    Signature(String),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for GambitError
pub type Result<T> = std::result::Result<T, GambitError>;

impl GambitError {
    /// True for failures raised by the exchange call itself (network, auth,
    /// rate limit, rejection) as opposed to local validation or configuration.
    pub fn is_exchange_failure(&self) -> bool {
        matches!(
            self,
            GambitError::Http(_)
                | GambitError::RateLimited(_)
                | GambitError::Exchange(_)
                | GambitError::Auth(_)
        )
    }
}
