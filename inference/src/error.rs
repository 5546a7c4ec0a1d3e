use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Tokenization failed: {0}")]
    Tokenization(String),

    #[error("ONNX inference failed: {0}")]
    OnnxInference(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InferenceError {
    /// True for errors raised while bringing a strategy up, as opposed to a
    /// single failed prediction.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, InferenceError::ModelLoad(_) | InferenceError::Config(_) | InferenceError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, InferenceError>;
