use crate::{InferenceError, ModelConfig, Result};
use std::path::Path;
use tokenizers::Tokenizer;

#[derive(Debug, Clone)]
pub struct TokenizerOutput {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
}

pub struct ReviewTokenizer {
    tokenizer: Tokenizer,
    max_length: usize,
    sep_id: Option<i64>,
}

impl ReviewTokenizer {
    pub fn new(tokenizer_path: &Path, max_length: usize) -> Result<Self> {
        tracing::info!("Loading tokenizer from: {:?}", tokenizer_path);

        let tokenizer_file = tokenizer_path.join("tokenizer.json");
        if !tokenizer_file.exists() {
            return Err(InferenceError::Tokenization(format!("Tokenizer file not found: {:?}", tokenizer_file)));
        }

        let tokenizer = Tokenizer::from_file(&tokenizer_file)
            .map_err(|e| InferenceError::Tokenization(format!("Failed to load tokenizer: {}", e)))?;
        let sep_id = tokenizer.token_to_id("[SEP]").map(i64::from);

        Ok(Self {
            tokenizer,
            max_length,
            sep_id,
        })
    }

    pub fn from_config(config: &ModelConfig, base_path: &Path) -> Result<Self> {
        Self::new(&base_path.join(&config.tokenizer_path), config.max_length)
    }

    /// Encodes without padding; a single sequence needs none.
    pub fn tokenize(&self, text: &str) -> Result<TokenizerOutput> {
        let cleaned = preprocess_text(text);

        let encoding = self
            .tokenizer
            .encode(cleaned, true)
            .map_err(|e| InferenceError::Tokenization(format!("Encoding failed: {}", e)))?;
        let mut input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let mut attention_mask: Vec<i64> = encoding.get_attention_mask().iter().map(|&m| m as i64).collect();

        if input_ids.len() > self.max_length {
            input_ids.truncate(self.max_length);
            attention_mask.truncate(self.max_length);

            // keep the closing [SEP]
            if let (Some(sep), Some(last)) = (self.sep_id, input_ids.last_mut()) {
                *last = sep;
            }
        }

        Ok(TokenizerOutput {
            input_ids,
            attention_mask,
        })
    }
}

fn preprocess_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn get_test_config() -> ModelConfig {
        ModelConfig {
            model_path: "model.onnx".to_string(),
            tokenizer_path: "tokenizer/".to_string(),
            max_length: 16,
            labels: vec!["NEGATIVE".to_string(), "POSITIVE".to_string()],
            model_type: "distilbert-sst2".to_string(),
        }
    }

    #[test]
    fn test_tokenization_truncates() {
        let base = PathBuf::from("models/sentiment");
        if !base.join("tokenizer/tokenizer.json").exists() {
            println!("Skipping tokenization test - tokenizer directory not found");
            return;
        }

        let config = get_test_config();
        let tokenizer = ReviewTokenizer::from_config(&config, &base).unwrap();
        let text = "the app keeps crashing every single time I try to send money to my family abroad";
        let result = tokenizer.tokenize(text).unwrap();

        assert_eq!(result.input_ids.len(), config.max_length);
        assert_eq!(result.attention_mask.len(), config.max_length);
    }

    #[test]
    fn test_missing_tokenizer() {
        let result = ReviewTokenizer::new(Path::new("/nonexistent"), 16);
        assert!(matches!(result, Err(InferenceError::Tokenization(_))));
    }

    #[test]
    fn test_text_preprocessing() {
        let cleaned = preprocess_text("  This is\na test\twith\nspecial\tcharacters  ");
        assert_eq!(cleaned, "This is a test with special characters");
    }
}
