use anyhow::{anyhow, Context, Result};
use bankreview_preprocessing::{NormalizerConfig, TokenizerBackend};
use bankreview_themes::{KeywordConfig, ThemeConfig};
use inference::SentimentConfig;
use insights::InsightsConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

const DEFAULT_BATCH_SIZE: usize = 64;
const DEFAULT_WORKERS: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Records per blocking annotation task.
    pub batch_size: usize,
    /// Annotation tasks allowed to run at once.
    pub workers: usize,
    pub normalizer: NormalizerConfig,
    pub sentiment: SentimentConfig,
    pub themes: ThemeConfig,
    pub keywords: KeywordConfig,
    pub insights: InsightsConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(DEFAULT_WORKERS),
            normalizer: NormalizerConfig::default(),
            sentiment: SentimentConfig::default(),
            themes: ThemeConfig::default(),
            keywords: KeywordConfig::default(),
            insights: InsightsConfig::default(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid {}: {:?}", name, value)),
        Err(_) => Ok(None),
    }
}

impl PipelineConfig {
    /// Defaults overridden by any `BANKREVIEW_*` variables that are set.
    pub fn from_env_or_default() -> Result<Self> {
        let mut config = Self::default();

        if let Some(batch_size) = parse_var("BANKREVIEW_BATCH_SIZE")? {
            config.batch_size = batch_size;
        }
        if let Some(workers) = parse_var("BANKREVIEW_WORKERS")? {
            config.workers = workers;
        }
        if let Ok(path) = env::var("BANKREVIEW_MODEL_CONFIG") {
            config.sentiment.model_config = Some(PathBuf::from(path));
        }
        if let Ok(path) = env::var("BANKREVIEW_TAXONOMY") {
            config.themes.taxonomy_path = Some(PathBuf::from(path));
        }
        if let Some(threshold) = parse_var("BANKREVIEW_THEME_THRESHOLD")? {
            config.themes.threshold = threshold;
        }
        if let Some(fallback) = parse_var("BANKREVIEW_LEXICON_FALLBACK")? {
            config.sentiment.lexicon_fallback = fallback;
        }
        if let Ok(backend) = env::var("BANKREVIEW_TOKENIZER") {
            config.normalizer.backend = backend
                .parse::<TokenizerBackend>()
                .context("Invalid BANKREVIEW_TOKENIZER")?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(anyhow!("batch_size must be greater than zero"));
        }
        if self.workers == 0 {
            return Err(anyhow!("workers must be greater than zero"));
        }

        self.normalizer.validate()?;
        self.sentiment.validate()?;
        self.themes.validate()?;
        self.keywords.validate()?;
        self.insights.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // env vars are process-wide
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const VARS: [&str; 7] = [
        "BANKREVIEW_BATCH_SIZE",
        "BANKREVIEW_WORKERS",
        "BANKREVIEW_MODEL_CONFIG",
        "BANKREVIEW_TAXONOMY",
        "BANKREVIEW_THEME_THRESHOLD",
        "BANKREVIEW_LEXICON_FALLBACK",
        "BANKREVIEW_TOKENIZER",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults_without_env() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let config = PipelineConfig::from_env_or_default().unwrap();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert!(config.workers > 0);
        assert!(config.sentiment.model_config.is_none());
        assert!(config.sentiment.lexicon_fallback);
        assert_eq!(config.normalizer.backend, TokenizerBackend::Linguistic);
    }

    #[test]
    fn test_env_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("BANKREVIEW_BATCH_SIZE", "8");
        env::set_var("BANKREVIEW_WORKERS", "2");
        env::set_var("BANKREVIEW_MODEL_CONFIG", "models/sentiment/model_config.json");
        env::set_var("BANKREVIEW_THEME_THRESHOLD", "0.25");
        env::set_var("BANKREVIEW_LEXICON_FALLBACK", "false");
        env::set_var("BANKREVIEW_TOKENIZER", "basic");

        let config = PipelineConfig::from_env_or_default().unwrap();
        clear_env();

        assert_eq!(config.batch_size, 8);
        assert_eq!(config.workers, 2);
        assert_eq!(
            config.sentiment.model_config,
            Some(PathBuf::from("models/sentiment/model_config.json"))
        );
        assert_eq!(config.themes.threshold, 0.25);
        assert!(!config.sentiment.lexicon_fallback);
        assert_eq!(config.normalizer.backend, TokenizerBackend::Basic);
    }

    #[test]
    fn test_invalid_env_values() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        env::set_var("BANKREVIEW_WORKERS", "many");
        assert!(PipelineConfig::from_env_or_default().is_err());
        clear_env();

        env::set_var("BANKREVIEW_BATCH_SIZE", "0");
        assert!(PipelineConfig::from_env_or_default().is_err());
        clear_env();

        env::set_var("BANKREVIEW_THEME_THRESHOLD", "2.0");
        assert!(PipelineConfig::from_env_or_default().is_err());
        clear_env();
    }
}
