//! Per-group keyword extraction.
//!
//! Each [`KeywordExtractor::fit_extract`] call fits a fresh TF-IDF model on
//! one group's texts. Nothing fitted survives the call, so groups can be
//! extracted concurrently and independently.

use crate::{Result, ThemeError};
use bankreview_preprocessing::stop_word_set;
use ndarray::{Array1, Array2, Axis};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Vocabulary cap, keeping the terms most frequent across the group.
    pub max_features: usize,
    /// Terms must appear in at least this many documents.
    pub min_df: usize,
    /// Terms appearing in more than this share of documents are dropped.
    pub max_df: f64,
    /// Largest n-gram fed into TF-IDF (unigrams through this).
    pub max_ngram: usize,
    pub top_terms: usize,
    pub top_ngrams: usize,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            max_features: 100,
            min_df: 2,
            max_df: 0.8,
            max_ngram: 2,
            top_terms: 20,
            top_ngrams: 15,
        }
    }
}

impl KeywordConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_features == 0 {
            return Err(ThemeError::Config("max_features must be greater than zero".to_string()));
        }
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(ThemeError::Config(format!("max_df must be within (0, 1], got {}", self.max_df)));
        }
        if self.max_ngram == 0 {
            return Err(ThemeError::Config("max_ngram must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTerm {
    pub term: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgramCount {
    pub ngram: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordKind {
    Keyword,
    Bigram,
}

/// Flat keyword record for external persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRow {
    pub bank: String,
    pub keyword: String,
    pub score: f64,
    #[serde(rename = "type")]
    pub kind: KeywordKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupKeywords {
    pub terms: Vec<RankedTerm>,
    pub bigrams: Vec<NgramCount>,
    pub trigrams: Vec<NgramCount>,
}

impl GroupKeywords {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.bigrams.is_empty() && self.trigrams.is_empty()
    }

    pub fn rows(&self, bank: &str) -> Vec<KeywordRow> {
        let keywords = self.terms.iter().map(|t| KeywordRow {
            bank: bank.to_string(),
            keyword: t.term.clone(),
            score: t.score,
            kind: KeywordKind::Keyword,
        });
        let bigrams = self.bigrams.iter().map(|b| KeywordRow {
            bank: bank.to_string(),
            keyword: b.ngram.clone(),
            score: b.count as f64,
            kind: KeywordKind::Bigram,
        });
        keywords.chain(bigrams).collect()
    }
}

pub struct KeywordExtractor {
    config: KeywordConfig,
    token_pattern: Regex,
    stop_words: HashSet<&'static str>,
}

impl KeywordExtractor {
    pub fn new(config: KeywordConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            token_pattern: Regex::new(r"\b\w\w+\b")?,
            stop_words: stop_word_set(),
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(KeywordConfig::default())
    }

    pub fn config(&self) -> &KeywordConfig {
        &self.config
    }

    /// Ranks one group's TF-IDF terms and raw bigram/trigram counts.
    pub fn fit_extract(&self, texts: &[&str]) -> GroupKeywords {
        let documents: Vec<Vec<String>> = texts.iter().map(|text| self.analyze(text)).collect();

        let terms = match TfIdfModel::fit(&documents, &self.config) {
            Some(model) => model.ranked_terms(&documents, self.config.top_terms),
            None => {
                tracing::debug!("No TF-IDF vocabulary for a group of {} documents", texts.len());
                Vec::new()
            }
        };

        GroupKeywords {
            terms,
            bigrams: ngram_counts(texts, 2, self.config.top_ngrams),
            trigrams: ngram_counts(texts, 3, self.config.top_ngrams),
        }
    }

    /// Word tokens minus stop words, followed by their n-grams.
    fn analyze(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = self
            .token_pattern
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|w| !self.stop_words.contains(w))
            .collect();

        let mut terms: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        for n in 2..=self.config.max_ngram {
            terms.extend(words.windows(n).map(|window| window.join(" ")));
        }
        terms
    }
}

/// Vocabulary and smoothed idf fitted on a single group.
struct TfIdfModel {
    vocabulary: BTreeMap<String, usize>,
    idf: Array1<f64>,
}

impl TfIdfModel {
    fn fit(documents: &[Vec<String>], config: &KeywordConfig) -> Option<Self> {
        let n_docs = documents.len();
        let max_doc_count = config.max_df * n_docs as f64;
        if max_doc_count < config.min_df as f64 {
            return None;
        }

        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        let mut term_frequency: HashMap<&str, usize> = HashMap::new();
        for document in documents {
            let mut seen = HashSet::new();
            for term in document {
                *term_frequency.entry(term.as_str()).or_insert(0) += 1;
                if seen.insert(term.as_str()) {
                    *document_frequency.entry(term.as_str()).or_insert(0) += 1;
                }
            }
        }

        let mut kept: Vec<(&str, usize)> = document_frequency
            .iter()
            .filter(|(_, &df)| df >= config.min_df && df as f64 <= max_doc_count)
            .map(|(&term, _)| (term, term_frequency.get(term).copied().unwrap_or(0)))
            .collect();
        if kept.is_empty() {
            return None;
        }

        kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        kept.truncate(config.max_features);

        let mut terms: Vec<&str> = kept.into_iter().map(|(term, _)| term).collect();
        terms.sort_unstable();

        let idf = Array1::from_iter(terms.iter().map(|term| {
            let df = document_frequency.get(term).copied().unwrap_or(0) as f64;
            ((1.0 + n_docs as f64) / (1.0 + df)).ln() + 1.0
        }));
        let vocabulary = terms.into_iter().enumerate().map(|(idx, term)| (term.to_string(), idx)).collect();

        Some(Self { vocabulary, idf })
    }

    /// Document-term matrix of shape (n_documents, n_features), each row
    /// L2-normalized.
    fn transform(&self, documents: &[Vec<String>]) -> Array2<f64> {
        let mut matrix = Array2::zeros((documents.len(), self.idf.len()));

        for (doc_idx, document) in documents.iter().enumerate() {
            for term in document {
                if let Some(&term_idx) = self.vocabulary.get(term) {
                    matrix[[doc_idx, term_idx]] += 1.0;
                }
            }
        }
        matrix *= &self.idf;

        for mut row in matrix.rows_mut() {
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row /= norm;
            }
        }
        matrix
    }

    fn ranked_terms(&self, documents: &[Vec<String>], top_n: usize) -> Vec<RankedTerm> {
        let Some(mean_weights) = self.transform(documents).mean_axis(Axis(0)) else {
            return Vec::new();
        };

        let mut ranked: Vec<RankedTerm> = self
            .vocabulary
            .iter()
            .map(|(term, &idx)| RankedTerm {
                term: term.clone(),
                score: mean_weights[idx],
            })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.term.cmp(&b.term)));
        ranked.truncate(top_n);
        ranked
    }
}

/// Counts whitespace n-grams across texts, most frequent first, ties in
/// order of first appearance.
pub fn ngram_counts(texts: &[&str], n: usize, top_n: usize) -> Vec<NgramCount> {
    if n == 0 {
        return Vec::new();
    }

    let mut counts: Vec<NgramCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for text in texts {
        let words: Vec<&str> = text.split_whitespace().collect();
        for window in words.windows(n) {
            let ngram = window.join(" ");
            match index.get(&ngram) {
                Some(&idx) => counts[idx].count += 1,
                None => {
                    index.insert(ngram.clone(), counts.len());
                    counts.push(NgramCount { ngram, count: 1 });
                }
            }
        }
    }

    // stable sort keeps first-appearance order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(top_n);
    counts
}
