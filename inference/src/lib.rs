pub mod classifier;
pub mod config;
pub mod error;
pub mod lexicon;
#[cfg(feature = "onnx")]
pub mod model;
#[cfg(feature = "onnx")]
pub mod tokenizer;
pub mod transformer;

use serde::{Deserialize, Serialize};

pub use classifier::{LexiconBackend, NeutralBackend, SentimentBackend, SentimentClassifier, Strategy};
pub use config::SentimentConfig;
pub use error::{InferenceError, Result};
pub use lexicon::PolarityLexicon;
pub use transformer::TransformerBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [SentimentLabel::Positive, SentimentLabel::Neutral, SentimentLabel::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub score: f64, // 0.0 to 1.0
}

impl SentimentResult {
    pub const NEUTRAL_SCORE: f64 = 0.5;

    pub fn new(label: SentimentLabel, score: f64) -> Self {
        let score = if score.is_finite() { score.clamp(0.0, 1.0) } else { Self::NEUTRAL_SCORE };
        Self { label, score }
    }

    pub fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: Self::NEUTRAL_SCORE,
        }
    }
}

// Configuration structure matching the exported model's config json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_path: String,
    pub tokenizer_path: String,
    pub max_length: usize,
    pub labels: Vec<String>,
    pub model_type: String,
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.labels.len() < 2 {
            return Err(InferenceError::Config(format!(
                "Expected at least 2 labels, got {}",
                self.labels.len()
            )));
        }
        if self.max_length == 0 {
            return Err(InferenceError::Config("max_length must be greater than zero".to_string()));
        }
        Ok(())
    }
}
