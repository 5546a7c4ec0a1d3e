use crate::config::{NormalizerConfig, TokenizerBackend};
use crate::lemmatizer::{LemmaTable, Lemmatizer, RuleLemmatizer};
use crate::models::{NormalizedReview, NormalizedText, RawReview};
use crate::stopwords::stop_word_set;
use crate::Result;
use regex::Regex;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

enum Tokenization {
    Linguistic(Box<dyn Lemmatizer>),
    Basic,
}

/// Deterministic text cleaning and tokenization.
///
/// The tokenization backend is fixed at construction. When the linguistic
/// backend cannot be set up the normalizer quietly uses the basic split, so
/// callers always receive the same [`NormalizedText`] shape.
pub struct Normalizer {
    url_regex: Regex,
    mention_regex: Regex,
    hashtag_regex: Regex,
    digit_regex: Regex,
    punctuation_regex: Regex,
    whitespace_regex: Regex,
    stop_words: HashSet<&'static str>,
    tokenization: Tokenization,
    basic_min_len: usize,
}

impl Normalizer {
    pub fn new(config: &NormalizerConfig) -> Result<Self> {
        config.validate()?;

        let tokenization = match config.backend {
            TokenizerBackend::Basic => Tokenization::Basic,
            TokenizerBackend::Linguistic => match &config.lemma_table {
                None => Tokenization::Linguistic(Box::new(RuleLemmatizer::new())),
                Some(path) => match LemmaTable::from_file(path) {
                    Ok(table) => {
                        tracing::info!("Linguistic tokenizer using lemma table with {} entries", table.len());
                        Tokenization::Linguistic(Box::new(table))
                    }
                    Err(e) => {
                        tracing::warn!("Lemma table unavailable ({}), falling back to basic tokenization", e);
                        Tokenization::Basic
                    }
                },
            },
        };

        Ok(Self {
            url_regex: Regex::new(r"http\S+")?,
            mention_regex: Regex::new(r"@\w+")?,
            hashtag_regex: Regex::new(r"#\w+")?,
            digit_regex: Regex::new(r"\d+")?,
            punctuation_regex: Regex::new(r"[^\w\s]")?,
            whitespace_regex: Regex::new(r"\s+")?,
            stop_words: stop_word_set(),
            tokenization,
            basic_min_len: config.basic_min_len,
        })
    }

    /// Normalizer with the default linguistic backend.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&NormalizerConfig::default())
    }

    pub fn is_linguistic(&self) -> bool {
        matches!(self.tokenization, Tokenization::Linguistic(_))
    }

    pub fn backend(&self) -> TokenizerBackend {
        match self.tokenization {
            Tokenization::Linguistic(_) => TokenizerBackend::Linguistic,
            Tokenization::Basic => TokenizerBackend::Basic,
        }
    }

    /// Lower-cases and strips URLs, mentions, hashtags, digits and
    /// punctuation, then collapses whitespace.
    pub fn clean_text(&self, text: &str) -> String {
        let mut cleaned = text.to_lowercase();
        cleaned = self.url_regex.replace_all(&cleaned, "").into_owned();
        cleaned = self.mention_regex.replace_all(&cleaned, "").into_owned();
        cleaned = self.hashtag_regex.replace_all(&cleaned, "").into_owned();
        cleaned = self.digit_regex.replace_all(&cleaned, "").into_owned();
        cleaned = self.punctuation_regex.replace_all(&cleaned, " ").into_owned();
        cleaned = self.whitespace_regex.replace_all(&cleaned, " ").into_owned();
        cleaned.trim().to_string()
    }

    /// Tokenizes already-cleaned text.
    pub fn tokenize(&self, cleaned: &str) -> Vec<String> {
        match &self.tokenization {
            Tokenization::Linguistic(lemmatizer) => cleaned
                .unicode_words()
                .filter(|word| word.chars().all(char::is_alphabetic))
                .filter(|word| !self.stop_words.contains(word))
                .map(|word| lemmatizer.lemmatize(word))
                .filter(|lemma| !lemma.is_empty() && !self.stop_words.contains(lemma.as_str()))
                .collect(),
            Tokenization::Basic => cleaned
                .split_whitespace()
                .filter(|word| word.chars().count() > self.basic_min_len)
                .map(str::to_string)
                .collect(),
        }
    }

    /// Missing text normalizes to an empty string with no tokens.
    pub fn normalize(&self, text: Option<&str>) -> NormalizedText {
        let Some(text) = text else {
            return NormalizedText::default();
        };

        let normalized_text = self.clean_text(text);
        let tokens = self.tokenize(&normalized_text);

        NormalizedText {
            normalized_text,
            tokens,
        }
    }

    pub fn normalize_review(&self, review: RawReview) -> NormalizedReview {
        let normalized = self.normalize(Some(&review.text));
        NormalizedReview::new(review, normalized)
    }

    pub fn normalize_batch(&self, reviews: Vec<RawReview>) -> Vec<NormalizedReview> {
        reviews
            .into_iter()
            .map(|review| self.normalize_review(review))
            .collect()
    }
}
