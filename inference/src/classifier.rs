use crate::config::SentimentConfig;
use crate::lexicon::PolarityLexicon;
use crate::transformer::TransformerBackend;
use crate::{Result, SentimentLabel, SentimentResult};

/// Polarity above this is POSITIVE, below its negation NEGATIVE.
pub const POLARITY_THRESHOLD: f64 = 0.1;

/// The strategy a classifier settled on at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Transformer,
    Lexicon,
    Neutral,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Transformer => "transformer",
            Strategy::Lexicon => "lexicon",
            Strategy::Neutral => "neutral",
        }
    }
}

/// One capability in the fallback chain. Implementations must be safe to
/// call from several workers at once.
pub trait SentimentBackend: Send + Sync {
    fn strategy(&self) -> Strategy;

    fn predict(&self, text: &str) -> Result<SentimentResult>;
}

pub struct LexiconBackend {
    lexicon: PolarityLexicon,
}

impl LexiconBackend {
    pub fn new(lexicon: PolarityLexicon) -> Self {
        Self { lexicon }
    }

    pub fn load(config: &SentimentConfig) -> Result<Self> {
        let lexicon = match &config.lexicon_path {
            Some(path) => PolarityLexicon::from_file(path)?,
            None => PolarityLexicon::new(),
        };
        Ok(Self::new(lexicon))
    }

    pub fn from_polarity(polarity: f64) -> SentimentResult {
        if polarity > POLARITY_THRESHOLD {
            SentimentResult::new(SentimentLabel::Positive, (polarity + 1.0) / 2.0)
        } else if polarity < -POLARITY_THRESHOLD {
            SentimentResult::new(SentimentLabel::Negative, (1.0 - polarity) / 2.0)
        } else {
            SentimentResult::neutral()
        }
    }
}

impl SentimentBackend for LexiconBackend {
    fn strategy(&self) -> Strategy {
        Strategy::Lexicon
    }

    fn predict(&self, text: &str) -> Result<SentimentResult> {
        Ok(Self::from_polarity(self.lexicon.polarity(text)))
    }
}

/// Last resort of the chain: every text is NEUTRAL at 0.5.
pub struct NeutralBackend;

impl SentimentBackend for NeutralBackend {
    fn strategy(&self) -> Strategy {
        Strategy::Neutral
    }

    fn predict(&self, _text: &str) -> Result<SentimentResult> {
        Ok(SentimentResult::neutral())
    }
}

/// Sentiment classifier over an ordered chain of strategies.
///
/// The first strategy that comes up at construction serves every call; a
/// failed prediction degrades only that call to NEUTRAL/0.5.
pub struct SentimentClassifier {
    backend: Box<dyn SentimentBackend>,
    max_chars: usize,
}

impl SentimentClassifier {
    pub fn new(config: &SentimentConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!("Initializing sentiment classifier...");

        if let Some(model_config) = &config.model_config {
            match TransformerBackend::load(model_config) {
                Ok(backend) => {
                    tracing::info!("Transformer sentiment model initialized");
                    return Ok(Self::with_backend(Box::new(backend), config.max_chars));
                }
                Err(e) if e.is_unavailable() => {
                    tracing::warn!("Transformer sentiment model unavailable: {}", e);
                }
                Err(e) => {
                    tracing::warn!("Transformer sentiment model failed to initialize: {}", e);
                }
            }
        }

        if config.lexicon_fallback {
            match LexiconBackend::load(config) {
                Ok(backend) => {
                    tracing::info!("Using lexicon sentiment analyzer");
                    return Ok(Self::with_backend(Box::new(backend), config.max_chars));
                }
                Err(e) => {
                    tracing::warn!("Lexicon sentiment analyzer unavailable: {}", e);
                }
            }
        }

        tracing::warn!("No sentiment analyzer available, every review will be NEUTRAL");
        Ok(Self::with_backend(Box::new(NeutralBackend), config.max_chars))
    }

    pub fn with_backend(backend: Box<dyn SentimentBackend>, max_chars: usize) -> Self {
        Self { backend, max_chars }
    }

    pub fn lexicon() -> Self {
        Self::with_backend(Box::new(LexiconBackend::new(PolarityLexicon::new())), crate::config::DEFAULT_MAX_CHARS)
    }

    pub fn neutral() -> Self {
        Self::with_backend(Box::new(NeutralBackend), crate::config::DEFAULT_MAX_CHARS)
    }

    pub fn strategy(&self) -> Strategy {
        self.backend.strategy()
    }

    /// Like [`classify`](Self::classify) but surfaces a failed prediction.
    pub fn try_classify(&self, text: &str) -> Result<SentimentResult> {
        if text.trim().is_empty() {
            return Ok(SentimentResult::neutral());
        }

        let truncated: String = text.chars().take(self.max_chars).collect();
        let result = self.backend.predict(&truncated)?;

        tracing::debug!(
            "Sentiment for '{}': {} ({:.3}) via {}",
            truncated.chars().take(50).collect::<String>(),
            result.label,
            result.score,
            self.backend.strategy().as_str()
        );

        Ok(SentimentResult::new(result.label, result.score))
    }

    pub fn classify(&self, text: &str) -> SentimentResult {
        match self.try_classify(text) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Sentiment inference failed, using NEUTRAL: {}", e);
                SentimentResult::neutral()
            }
        }
    }

    pub fn classify_batch(&self, texts: &[&str]) -> Vec<SentimentResult> {
        texts.iter().map(|text| self.classify(text)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InferenceError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FlakyBackend {
        calls: Arc<AtomicUsize>,
    }

    impl SentimentBackend for FlakyBackend {
        fn strategy(&self) -> Strategy {
            Strategy::Transformer
        }

        fn predict(&self, text: &str) -> Result<SentimentResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text.contains("boom") {
                return Err(InferenceError::OnnxInference("session died".to_string()));
            }
            Ok(SentimentResult::new(SentimentLabel::Positive, 0.97))
        }
    }

    #[test]
    fn test_polarity_mapping() {
        let positive = LexiconBackend::from_polarity(0.8);
        assert_eq!(positive.label, SentimentLabel::Positive);
        assert!((positive.score - 0.9).abs() < 1e-9);

        let negative = LexiconBackend::from_polarity(-0.5);
        assert_eq!(negative.label, SentimentLabel::Negative);
        assert!((negative.score - 0.75).abs() < 1e-9);

        assert_eq!(LexiconBackend::from_polarity(0.1), SentimentResult::neutral());
        assert_eq!(LexiconBackend::from_polarity(-0.1), SentimentResult::neutral());
    }

    #[test]
    fn test_empty_text_skips_backend() {
        let calls = Arc::new(AtomicUsize::new(0));
        let classifier = SentimentClassifier::with_backend(
            Box::new(FlakyBackend { calls: Arc::clone(&calls) }),
            512,
        );

        assert_eq!(classifier.classify(""), SentimentResult::neutral());
        assert_eq!(classifier.classify("   \n"), SentimentResult::neutral());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_per_call_failure_degrades_only_that_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let classifier = SentimentClassifier::with_backend(
            Box::new(FlakyBackend { calls: Arc::clone(&calls) }),
            512,
        );

        let results = classifier.classify_batch(&["fine", "boom", "fine again"]);
        assert_eq!(results[0].label, SentimentLabel::Positive);
        assert_eq!(results[1], SentimentResult::neutral());
        assert_eq!(results[2].label, SentimentLabel::Positive);
        assert!(classifier.try_classify("boom").is_err());
        assert_eq!(classifier.strategy(), Strategy::Transformer);
    }

    #[test]
    fn test_text_truncated_to_char_limit() {
        let classifier = SentimentClassifier::with_backend(
            Box::new(FlakyBackend { calls: Arc::new(AtomicUsize::new(0)) }),
            10,
        );

        // "boom" lies beyond the first 10 characters
        let text = format!("{}boom", "a".repeat(20));
        assert_eq!(classifier.classify(&text).label, SentimentLabel::Positive);
    }

    #[test]
    fn test_missing_model_falls_back_to_lexicon() {
        let config = SentimentConfig::with_model("/nonexistent/model_config.json");
        let classifier = SentimentClassifier::new(&config).unwrap();

        assert_eq!(classifier.strategy(), Strategy::Lexicon);
        assert_eq!(classifier.classify("great transfer speed").label, SentimentLabel::Positive);
    }

    #[test]
    fn test_no_analyzer_is_neutral() {
        let config = SentimentConfig {
            lexicon_fallback: false,
            ..SentimentConfig::default()
        };
        let classifier = SentimentClassifier::new(&config).unwrap();

        assert_eq!(classifier.strategy(), Strategy::Neutral);
        assert_eq!(classifier.classify("I hate this app"), SentimentResult::neutral());
    }

    #[test]
    fn test_broken_lexicon_file_falls_through_to_neutral() {
        let config = SentimentConfig {
            lexicon_path: Some("/nonexistent/lexicon.json".into()),
            ..SentimentConfig::default()
        };
        let classifier = SentimentClassifier::new(&config).unwrap();
        assert_eq!(classifier.strategy(), Strategy::Neutral);
    }
}
