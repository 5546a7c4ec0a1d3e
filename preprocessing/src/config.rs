use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which tokenization strategy the normalizer should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerBackend {
    /// Unicode word segmentation, stop-word removal and lemmatization.
    Linguistic,
    /// Whitespace split keeping tokens longer than two characters.
    Basic,
}

impl std::str::FromStr for TokenizerBackend {
    type Err = crate::PreprocessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "linguistic" => Ok(TokenizerBackend::Linguistic),
            "basic" => Ok(TokenizerBackend::Basic),
            other => Err(crate::PreprocessingError::Config(format!(
                "Unknown tokenizer backend: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    pub backend: TokenizerBackend,
    /// Optional JSON map of inflected form -> lemma consulted before the rules.
    pub lemma_table: Option<PathBuf>,
    /// Minimum length a token must exceed in the basic backend.
    pub basic_min_len: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            backend: TokenizerBackend::Linguistic,
            lemma_table: None,
            basic_min_len: 2,
        }
    }
}

impl NormalizerConfig {
    pub fn basic() -> Self {
        Self {
            backend: TokenizerBackend::Basic,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.lemma_table {
            if path.as_os_str().is_empty() {
                return Err(crate::PreprocessingError::Config(
                    "Lemma table path cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
