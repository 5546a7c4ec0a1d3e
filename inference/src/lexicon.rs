//! Polarity lexicon for rule-based review sentiment.
//!
//! Scores a text in [-1, 1] as the mean polarity of the lexicon words it
//! contains, adjusted by preceding negations and intensifiers.

use crate::{InferenceError, Result};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Words this far back may negate or intensify a sentiment word.
const MODIFIER_WINDOW: usize = 2;

/// Polarity multiplier applied under negation.
const NEGATION_FACTOR: f64 = -0.5;

pub struct PolarityLexicon {
    /// Word to polarity mapping
    words: HashMap<String, f64>,
    negations: HashSet<String>,
    /// Intensifier word to multiplier
    intensifiers: HashMap<String, f64>,
}

impl Default for PolarityLexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityLexicon {
    pub fn new() -> Self {
        let positive_words = [
            ("amazing", 0.6),
            ("awesome", 1.0),
            ("best", 1.0),
            ("convenient", 0.5),
            ("easy", 0.43),
            ("efficient", 0.4),
            ("excellent", 1.0),
            ("fantastic", 0.4),
            ("fast", 0.2),
            ("friendly", 0.375),
            ("good", 0.7),
            ("great", 0.8),
            ("happy", 0.8),
            ("helpful", 0.5),
            ("love", 0.5),
            ("nice", 0.6),
            ("perfect", 1.0),
            ("quick", 0.33),
            ("recommend", 0.3),
            ("reliable", 0.4),
            ("satisfied", 0.5),
            ("secure", 0.4),
            ("smooth", 0.4),
            ("thank", 0.2),
            ("useful", 0.3),
            ("wonderful", 1.0),
            ("work", 0.1),
        ];

        let negative_words = [
            ("annoying", -0.8),
            ("awful", -1.0),
            ("bad", -0.7),
            ("broken", -0.4),
            ("bug", -0.4),
            ("crash", -0.6),
            ("difficult", -0.5),
            ("disappointed", -0.75),
            ("disappointing", -0.6),
            ("error", -0.4),
            ("fail", -0.5),
            ("freeze", -0.4),
            ("frustrating", -0.4),
            ("hate", -0.8),
            ("horrible", -1.0),
            ("lag", -0.3),
            ("poor", -0.4),
            ("problem", -0.3),
            ("slow", -0.3),
            ("stuck", -0.3),
            ("terrible", -1.0),
            ("unable", -0.5),
            ("useless", -0.5),
            ("waste", -0.2),
            ("worst", -1.0),
            ("wrong", -0.5),
        ];

        let words = positive_words
            .into_iter()
            .chain(negative_words)
            .map(|(word, score)| (word.to_string(), score))
            .collect();

        Self::with_words(words)
    }

    /// Lexicon with custom word polarities and the default modifiers.
    pub fn with_words(words: HashMap<String, f64>) -> Self {
        let negations = [
            "not", "no", "never", "cannot", "cant", "dont", "don", "doesnt", "doesn",
            "didnt", "didn", "isnt", "isn", "wasnt", "wasn", "wont", "hardly", "barely",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let intensifiers = [
            ("absolutely", 1.4),
            ("completely", 1.4),
            ("extremely", 1.5),
            ("highly", 1.3),
            ("really", 1.3),
            ("so", 1.3),
            ("super", 1.4),
            ("too", 1.3),
            ("totally", 1.3),
            ("very", 1.3),
        ]
        .into_iter()
        .map(|(word, factor)| (word.to_string(), factor))
        .collect();

        Self {
            words,
            negations,
            intensifiers,
        }
    }

    /// Loads a JSON object of `word -> polarity`; every polarity must lie in [-1, 1].
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::info!("Loading polarity lexicon from: {:?}", path);

        let content = std::fs::read_to_string(path)
            .map_err(|e| InferenceError::Config(format!("Failed to read lexicon file: {}", e)))?;
        let raw: HashMap<String, f64> = serde_json::from_str(&content)
            .map_err(|e| InferenceError::Config(format!("Failed to parse lexicon: {}", e)))?;

        if raw.is_empty() {
            return Err(InferenceError::Config("Lexicon is empty".to_string()));
        }
        if let Some((word, score)) = raw.iter().find(|(_, s)| !(-1.0..=1.0).contains(*s)) {
            return Err(InferenceError::Config(format!(
                "Polarity for '{}' out of range: {}",
                word, score
            )));
        }

        let words = raw.into_iter().map(|(w, s)| (w.to_lowercase(), s)).collect();
        Ok(Self::with_words(words))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Looks a word up directly, then through its common inflection stems.
    pub fn word_polarity(&self, word: &str) -> Option<f64> {
        if let Some(score) = self.words.get(word) {
            return Some(*score);
        }

        for suffix in ["ing", "ed", "es", "s"] {
            if let Some(stem) = word.strip_suffix(suffix) {
                if stem.len() < 3 {
                    continue;
                }
                if let Some(score) = self.words.get(stem) {
                    return Some(*score);
                }
                if let Some(score) = self.words.get(&format!("{}e", stem)) {
                    return Some(*score);
                }
            }
        }

        None
    }

    /// Polarity of a text in [-1, 1]; 0.0 when no lexicon word occurs.
    pub fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphabetic())
            .filter(|w| !w.is_empty())
            .collect();

        let mut scores = Vec::new();
        for (i, word) in words.iter().enumerate() {
            let Some(mut score) = self.word_polarity(word) else {
                continue;
            };

            for previous in words[i.saturating_sub(MODIFIER_WINDOW)..i].iter().rev() {
                if self.negations.contains(*previous) {
                    score *= NEGATION_FACTOR;
                } else if let Some(factor) = self.intensifiers.get(*previous) {
                    score *= factor;
                }
            }

            scores.push(score.clamp(-1.0, 1.0));
        }

        if scores.is_empty() {
            return 0.0;
        }

        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}
