use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreprocessingError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data load error: {0}")]
    DataLoad(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl From<regex::Error> for PreprocessingError {
    fn from(err: regex::Error) -> Self {
        PreprocessingError::Config(format!("invalid cleaning pattern: {}", err))
    }
}

/// Result type alias for preprocessing operations
pub type Result<T> = std::result::Result<T, PreprocessingError>;
