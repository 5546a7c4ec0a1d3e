//! Lemmatization backends for the linguistic tokenizer.

use crate::{PreprocessingError, Result};
use std::collections::HashMap;
use std::path::Path;

pub trait Lemmatizer: Send + Sync {
    /// Returns the dictionary form of a lower-case alphabetic word.
    fn lemmatize(&self, word: &str) -> String;
}

const IRREGULAR: &[(&str, &str)] = &[
    ("children", "child"),
    ("feet", "foot"),
    ("gone", "go"),
    ("got", "get"),
    ("kept", "keep"),
    ("made", "make"),
    ("men", "man"),
    ("paid", "pay"),
    ("people", "person"),
    ("sent", "send"),
    ("taken", "take"),
    ("took", "take"),
    ("went", "go"),
    ("women", "woman"),
    ("worse", "bad"),
    ("worst", "bad"),
];

/// Suffix-stripping lemmatizer for English inflections (plural nouns,
/// progressive and past verb forms).
#[derive(Debug, Default, Clone)]
pub struct RuleLemmatizer;

impl RuleLemmatizer {
    pub fn new() -> Self {
        Self
    }

    fn strip_verb_suffix(word: &str, suffix: &str) -> Option<String> {
        let stem = word.strip_suffix(suffix)?;
        if stem.chars().count() < 3 || !stem.chars().any(is_vowel) {
            return None;
        }

        let chars: Vec<char> = stem.chars().collect();
        let n = chars.len();

        // running -> run, stopped -> stop
        if n >= 2 && chars[n - 1] == chars[n - 2] && !matches!(chars[n - 1], 'l' | 's' | 'z') {
            return Some(chars[..n - 1].iter().collect());
        }

        // updating -> update, finalized -> finalize
        if stem.ends_with("at") || stem.ends_with("iz") || stem.ends_with("bl") {
            return Some(format!("{}e", stem));
        }

        Some(stem.to_string())
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

impl Lemmatizer for RuleLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        if let Some((_, lemma)) = IRREGULAR.iter().find(|(form, _)| *form == word) {
            return lemma.to_string();
        }

        let len = word.chars().count();
        if len <= 3 {
            return word.to_string();
        }

        if len > 4 {
            if let Some(stem) = word.strip_suffix("ies") {
                return format!("{}y", stem);
            }
        }

        if word.ends_with("sses") {
            return word[..word.len() - 2].to_string();
        }

        if len > 5 && word.ends_with("ing") {
            if let Some(stem) = Self::strip_verb_suffix(word, "ing") {
                return stem;
            }
        }

        if len > 4 && word.ends_with("ed") && !word.ends_with("eed") {
            if let Some(stem) = Self::strip_verb_suffix(word, "ed") {
                return stem;
            }
        }

        for suffix in ["ches", "shes", "xes", "zes"] {
            if word.ends_with(suffix) {
                return word[..word.len() - 2].to_string();
            }
        }

        if word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us") && !word.ends_with("is") {
            return word[..word.len() - 1].to_string();
        }

        word.to_string()
    }
}

/// Dictionary lemmatizer loaded from a JSON object of `form -> lemma`,
/// delegating unknown words to [`RuleLemmatizer`].
#[derive(Debug, Clone, Default)]
pub struct LemmaTable {
    entries: HashMap<String, String>,
    rules: RuleLemmatizer,
}

impl LemmaTable {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self {
            entries,
            rules: RuleLemmatizer::new(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::info!("Loading lemma table from: {:?}", path);

        let content = std::fs::read_to_string(path)?;
        let entries: HashMap<String, String> = serde_json::from_str(&content)?;
        if entries.is_empty() {
            return Err(PreprocessingError::Config(format!(
                "Lemma table {:?} is empty",
                path
            )));
        }

        let entries = entries
            .into_iter()
            .map(|(form, lemma)| (form.to_lowercase(), lemma.to_lowercase()))
            .collect();

        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Lemmatizer for LemmaTable {
    fn lemmatize(&self, word: &str) -> String {
        match self.entries.get(word) {
            Some(lemma) => lemma.clone(),
            None => self.rules.lemmatize(word),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_rule_lemmatizer_inflections() {
        let lemmatizer = RuleLemmatizer::new();
        let cases = [
            ("crashes", "crash"),
            ("crashing", "crash"),
            ("crashed", "crash"),
            ("transfers", "transfer"),
            ("replies", "reply"),
            ("running", "run"),
            ("updating", "update"),
            ("failed", "fail"),
            ("loading", "load"),
            ("kept", "keep"),
            ("status", "status"),
            ("access", "access"),
            ("app", "app"),
            ("need", "need"),
        ];

        for (word, expected) in cases {
            assert_eq!(lemmatizer.lemmatize(word), expected, "lemma of {}", word);
        }
    }

    #[test]
    fn test_short_words_untouched() {
        let lemmatizer = RuleLemmatizer::new();
        assert_eq!(lemmatizer.lemmatize("bug"), "bug");
        assert_eq!(lemmatizer.lemmatize("pin"), "pin");
    }

    #[test]
    fn test_lemma_table_overrides_rules() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Better": "good", "logins": "login"}}"#).unwrap();

        let table = LemmaTable::from_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lemmatize("better"), "good");
        assert_eq!(table.lemmatize("logins"), "login");
        assert_eq!(table.lemmatize("payments"), "payment");
    }

    #[test]
    fn test_lemma_table_missing_file() {
        let result = LemmaTable::from_file(Path::new("/nonexistent/lemmas.json"));
        assert!(result.is_err());
    }
}
