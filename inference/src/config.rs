use crate::{InferenceError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Characters of a text handed to the classifier.
pub const DEFAULT_MAX_CHARS: usize = 512;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// JSON model config for the transformer strategy; `None` skips it.
    pub model_config: Option<PathBuf>,
    /// Whether the lexicon analyzer may serve as a fallback.
    pub lexicon_fallback: bool,
    /// Optional JSON `word -> polarity` map replacing the built-in lexicon words.
    pub lexicon_path: Option<PathBuf>,
    pub max_chars: usize,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            model_config: None,
            lexicon_fallback: true,
            lexicon_path: None,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl SentimentConfig {
    pub fn with_model(model_config: impl Into<PathBuf>) -> Self {
        Self {
            model_config: Some(model_config.into()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_chars == 0 {
            return Err(InferenceError::Config(
                "max_chars must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
