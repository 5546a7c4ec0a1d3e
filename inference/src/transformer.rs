//! Primary strategy: a pretrained binary sentiment transformer exported to ONNX.

use crate::classifier::{SentimentBackend, Strategy};
use crate::{InferenceError, ModelConfig, Result, SentimentLabel, SentimentResult};
use std::path::Path;

#[cfg(feature = "onnx")]
use crate::model::SentimentModel;
#[cfg(feature = "onnx")]
use crate::tokenizer::ReviewTokenizer;
#[cfg(feature = "onnx")]
use std::sync::Mutex;

pub struct TransformerBackend {
    #[cfg(feature = "onnx")]
    model: Mutex<SentimentModel>,
    #[cfg(feature = "onnx")]
    tokenizer: ReviewTokenizer,
    config: ModelConfig,
}

impl TransformerBackend {
    pub fn load(config_path: &Path) -> Result<Self> {
        tracing::info!("Initializing transformer sentiment model from: {:?}", config_path);

        let config = read_model_config(config_path)?;

        #[cfg(feature = "onnx")]
        {
            let base_dir = config_path
                .parent()
                .ok_or_else(|| InferenceError::Config("Invalid config path".to_string()))?;
            let tokenizer = ReviewTokenizer::from_config(&config, base_dir)?;
            let model = SentimentModel::new(&base_dir.join(&config.model_path), config.clone())?;

            Ok(Self {
                model: Mutex::new(model),
                tokenizer,
                config,
            })
        }

        #[cfg(not(feature = "onnx"))]
        {
            Err(InferenceError::ModelLoad(format!(
                "{} model configured but inference was built without the `onnx` feature",
                config.model_type
            )))
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Maps class probabilities to a result using the model's label names.
    /// Labels other than POSITIVE/NEGATIVE become NEUTRAL at 0.5.
    pub fn probabilities_to_sentiment(labels: &[String], probabilities: &[f64]) -> Result<SentimentResult> {
        if probabilities.len() != labels.len() {
            return Err(InferenceError::OnnxInference(format!(
                "Expected {} probabilities, got {}",
                labels.len(),
                probabilities.len()
            )));
        }

        let best = probabilities
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (idx, &prob)| match best {
                Some((_, best_prob)) if best_prob >= prob => best,
                _ => Some((idx, prob)),
            });

        let Some((max_idx, max_prob)) = best else {
            return Err(InferenceError::OnnxInference("Model returned no probabilities".to_string()));
        };

        let result = match labels[max_idx].to_uppercase().as_str() {
            "POSITIVE" => SentimentResult::new(SentimentLabel::Positive, max_prob),
            "NEGATIVE" => SentimentResult::new(SentimentLabel::Negative, max_prob),
            _ => SentimentResult::neutral(),
        };

        Ok(result)
    }
}

fn read_model_config(config_path: &Path) -> Result<ModelConfig> {
    let config_content = std::fs::read_to_string(config_path)
        .map_err(|e| InferenceError::Config(format!("Failed to read config file: {}", e)))?;
    let config: ModelConfig = serde_json::from_str(&config_content)
        .map_err(|e| InferenceError::Config(format!("Failed to parse config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

/// A panic during one inference leaves the session usable for the next call.
#[cfg(any(feature = "onnx", test))]
fn lock_session<T>(session: &std::sync::Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    session.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("Recovering model session after a panicked inference");
        poisoned.into_inner()
    })
}

impl SentimentBackend for TransformerBackend {
    fn strategy(&self) -> Strategy {
        Strategy::Transformer
    }

    #[cfg(feature = "onnx")]
    fn predict(&self, text: &str) -> Result<SentimentResult> {
        let tokens = self.tokenizer.tokenize(text)?;
        let probabilities = {
            let mut model = lock_session(&self.model);
            model.run_inference(&tokens.input_ids, &tokens.attention_mask)?
        };
        Self::probabilities_to_sentiment(&self.config.labels, &probabilities)
    }

    #[cfg(not(feature = "onnx"))]
    fn predict(&self, _text: &str) -> Result<SentimentResult> {
        Err(InferenceError::ModelLoad("onnx feature disabled".to_string()))
    }
}
