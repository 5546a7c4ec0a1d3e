use crate::{InferenceError, ModelConfig, Result};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;

pub struct SentimentModel {
    session: Session,
    config: ModelConfig,
}

impl SentimentModel {
    pub fn new(model_path: &Path, config: ModelConfig) -> Result<Self> {
        tracing::info!("Loading sentiment model from: {:?}", model_path);

        if !model_path.exists() {
            return Err(InferenceError::ModelLoad(format!("Model file not found: {:?}", model_path)));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to set optimization level: {}", e)))?
            .with_intra_threads(1)
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to set thread count: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to load model: {}", e)))?;

        tracing::info!("Successfully loaded {} model", config.model_type);
        Ok(Self { session, config })
    }

    /// Runs one sequence through the model and returns class probabilities.
    pub fn run_inference(&mut self, input_ids: &[i64], attention_mask: &[i64]) -> Result<Vec<f64>> {
        use ort::inputs;

        let input_ids_array = ndarray::Array2::from_shape_vec((1, input_ids.len()), input_ids.to_vec())
            .map_err(|e| InferenceError::OnnxInference(format!("Failed to create input_ids array: {}", e)))?;
        let attention_mask_array = ndarray::Array2::from_shape_vec((1, attention_mask.len()), attention_mask.to_vec())
            .map_err(|e| InferenceError::OnnxInference(format!("Failed to create attention_mask array: {}", e)))?;

        let input_tensor = Value::from_array(input_ids_array)
            .map_err(|e| InferenceError::OnnxInference(format!("Failed to build input tensor: {}", e)))?;
        let attention_tensor = Value::from_array(attention_mask_array)
            .map_err(|e| InferenceError::OnnxInference(format!("Failed to build attention tensor: {}", e)))?;

        let logits: Vec<f64> = {
            let outputs = self
                .session
                .run(inputs![
                    "input_ids" => input_tensor,
                    "attention_mask" => attention_tensor
                ])
                .map_err(|e| InferenceError::OnnxInference(format!("Inference failed: {}", e)))?;

            let (_shape, data) = outputs["logits"]
                .try_extract_tensor::<f32>()
                .map_err(|e| InferenceError::OnnxInference(format!("Failed to extract logits: {}", e)))?;

            data.iter().map(|&x| x as f64).collect()
        };

        if logits.len() != self.config.labels.len() {
            return Err(InferenceError::OnnxInference(format!(
                "Model produced {} logits for {} labels",
                logits.len(),
                self.config.labels.len()
            )));
        }

        Ok(softmax(&logits))
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }
}

pub(crate) fn softmax(logits: &[f64]) -> Vec<f64> {
    let max_logit = logits.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let exp_logits: Vec<f64> = logits.iter().map(|&x| (x - max_logit).exp()).collect();
    let sum_exp: f64 = exp_logits.iter().sum();

    exp_logits.iter().map(|&x| x / sum_exp).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn get_test_config() -> ModelConfig {
        ModelConfig {
            model_path: "model.onnx".to_string(),
            tokenizer_path: "tokenizer/".to_string(),
            max_length: 512,
            labels: vec!["NEGATIVE".to_string(), "POSITIVE".to_string()],
            model_type: "distilbert-sst2".to_string(),
        }
    }

    #[test]
    fn test_model_load() {
        let model_path = PathBuf::from("models/sentiment/model.onnx");
        let result = SentimentModel::new(&model_path, get_test_config());

        if model_path.exists() {
            assert!(result.is_ok(), "Model loading should succeed when file exists");
        } else {
            assert!(matches!(result, Err(InferenceError::ModelLoad(_))));
        }
    }

    #[test]
    fn test_softmax() {
        let probabilities = softmax(&[1.0, 2.0, 3.0]);
        let total: f64 = probabilities.iter().sum();

        assert!((total - 1.0).abs() < 1e-9, "Softmax probabilities should sum to 1.0");
        assert!(probabilities[2] > probabilities[1] && probabilities[1] > probabilities[0]);
    }

    #[test]
    fn test_softmax_large_logits_stay_finite() {
        let probabilities = softmax(&[1000.0, 1001.0]);
        assert!(probabilities.iter().all(|p| p.is_finite()));
    }
}
