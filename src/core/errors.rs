use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnomalyError {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("Weather service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for AnomalyError {
    fn from(err: std::io::Error) -> Self {
        AnomalyError::InvalidData(err.to_string())
    }
}

impl From<reqwest::Error> for AnomalyError {
    fn from(err: reqwest::Error) -> Self {
        AnomalyError::ExternalService(err.to_string())
    }
}

// Result type alias for convenience
pub type AnomalyResult<T> = Result<T, AnomalyError>;
