use crate::taxonomy::Taxonomy;
use crate::{Result, ThemeError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Minimum share of the best theme's score a theme needs to be assigned.
pub const DEFAULT_THEME_THRESHOLD: f64 = 0.1;

const WHOLE_WORD_WEIGHT: u32 = 2;
const SUBSTRING_WEIGHT: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub threshold: f64,
    /// JSON taxonomy replacing the built-in one.
    pub taxonomy_path: Option<PathBuf>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THEME_THRESHOLD,
            taxonomy_path: None,
        }
    }
}

impl ThemeConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ThemeError::Config(format!(
                "theme threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeScore {
    pub theme: String,
    pub score: u32,
}

/// Themes assigned to one text, both lists in taxonomy order. `raw_scores`
/// holds every theme that scored above zero, assigned or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeAssignment {
    pub themes: Vec<String>,
    pub raw_scores: Vec<ThemeScore>,
}

impl ThemeAssignment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.themes.iter().any(|t| t == tag)
    }

    pub fn score(&self, tag: &str) -> u32 {
        self.raw_scores
            .iter()
            .find(|s| s.theme == tag)
            .map(|s| s.score)
            .unwrap_or(0)
    }
}

/// Rule-based multi-label theme tagger over a fixed taxonomy.
pub struct ThemeClassifier {
    taxonomy: Taxonomy,
    threshold: f64,
}

impl ThemeClassifier {
    pub fn new(taxonomy: Taxonomy, threshold: f64) -> Result<Self> {
        ThemeConfig {
            threshold,
            taxonomy_path: None,
        }
        .validate()?;
        taxonomy.validate()?;
        Ok(Self { taxonomy, threshold })
    }

    pub fn from_config(config: &ThemeConfig) -> Result<Self> {
        config.validate()?;
        let taxonomy = match &config.taxonomy_path {
            Some(path) => Taxonomy::from_file(path)?,
            None => Taxonomy::default(),
        };
        Self::new(taxonomy, config.threshold)
    }

    pub fn with_defaults() -> Self {
        Self {
            taxonomy: Taxonomy::default(),
            threshold: DEFAULT_THEME_THRESHOLD,
        }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whole-word keyword hits weigh 2, bare substring hits 1. A theme is
    /// assigned when its score reaches `threshold` of the best score.
    pub fn classify(&self, text: &str) -> ThemeAssignment {
        let text = text.trim().to_lowercase();
        if text.is_empty() {
            return ThemeAssignment::empty();
        }

        let padded = format!(" {} ", text);
        let raw_scores: Vec<ThemeScore> = self
            .taxonomy
            .themes()
            .iter()
            .map(|theme| ThemeScore {
                theme: theme.tag.clone(),
                score: theme
                    .keywords
                    .iter()
                    .map(|keyword| keyword_weight(&text, &padded, keyword))
                    .sum(),
            })
            .filter(|s| s.score > 0)
            .collect();

        let Some(max_score) = raw_scores.iter().map(|s| s.score).max() else {
            return ThemeAssignment::empty();
        };

        let themes = raw_scores
            .iter()
            .filter(|s| s.score as f64 / max_score as f64 >= self.threshold)
            .map(|s| s.theme.clone())
            .collect();

        ThemeAssignment { themes, raw_scores }
    }

    pub fn classify_batch(&self, texts: &[&str]) -> Vec<ThemeAssignment> {
        texts.iter().map(|text| self.classify(text)).collect()
    }
}

fn keyword_weight(text: &str, padded: &str, keyword: &str) -> u32 {
    if !text.contains(keyword) {
        return 0;
    }
    if padded.contains(&format!(" {} ", keyword)) {
        WHOLE_WORD_WEIGHT
    } else {
        SUBSTRING_WEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{ThemeDefinition, APP_PERFORMANCE, SECURITY_ACCESS, TRANSACTIONS};

    #[test]
    fn test_slow_and_crashing_is_performance() {
        let classifier = ThemeClassifier::with_defaults();
        let result = classifier.classify("app is slow and keeps crashing");

        assert!(result.contains(APP_PERFORMANCE));
        // "slow" whole word, "crash" inside "crashing"
        assert_eq!(result.score(APP_PERFORMANCE), 3);
    }

    #[test]
    fn test_whole_word_outweighs_substring() {
        let classifier = ThemeClassifier::with_defaults();
        let result = classifier.classify("crashes during transfer");

        assert_eq!(result.themes, vec![APP_PERFORMANCE, TRANSACTIONS]);
        assert_eq!(result.score(APP_PERFORMANCE), 1);
        assert_eq!(result.score(TRANSACTIONS), 2);
    }

    #[test]
    fn test_threshold_is_relative_to_best_theme() {
        let taxonomy = Taxonomy::new(vec![
            ThemeDefinition::new("STRONG", &["a1", "a2", "a3", "a4", "a5"]),
            ThemeDefinition::new("WEAK", &["b1"]),
        ])
        .unwrap();
        let text = "a1 a2 a3 a4 a5 xb1";

        let lenient = ThemeClassifier::new(taxonomy.clone(), 0.1).unwrap();
        let result = lenient.classify(text);
        assert_eq!(result.themes, vec!["STRONG", "WEAK"]);

        // 1 / 10 falls short of 0.2
        let strict = ThemeClassifier::new(taxonomy, 0.2).unwrap();
        let result = strict.classify(text);
        assert_eq!(result.themes, vec!["STRONG"]);
        assert_eq!(result.score("WEAK"), 1);
    }

    #[test]
    fn test_case_insensitive_multi_word_keywords() {
        let classifier = ThemeClassifier::with_defaults();
        let result = classifier.classify("Face ID never works");

        assert_eq!(result.themes, vec![SECURITY_ACCESS]);
        assert_eq!(result.score(SECURITY_ACCESS), 2);
    }

    #[test]
    fn test_no_keywords_no_themes() {
        let classifier = ThemeClassifier::with_defaults();

        assert!(classifier.classify("").is_empty());
        assert!(classifier.classify("   ").is_empty());

        let result = classifier.classify("okay i guess");
        assert!(result.is_empty());
        assert!(result.raw_scores.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let classifier = ThemeClassifier::with_defaults();
        let text = "login takes forever and the transfer button is broken";

        let first = classifier.classify(text);
        let second = classifier.classify(text);
        assert_eq!(first, second);
        assert!(first.themes.len() > 1);
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(ThemeClassifier::new(Taxonomy::default(), 1.5).is_err());
        assert!(ThemeClassifier::new(Taxonomy::default(), f64::NAN).is_err());
    }
}
