use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Invalid taxonomy: {0}")]
    Taxonomy(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<regex::Error> for ThemeError {
    fn from(err: regex::Error) -> Self {
        ThemeError::Config(format!("invalid token pattern: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, ThemeError>;
