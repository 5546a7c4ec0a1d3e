use serde::{Deserialize, Serialize};

/// Review record as delivered by an external loader. Every field is optional
/// on the wire; ingestion decides what survives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub review: Option<String>,
    pub rating: Option<i64>,
    pub date: Option<String>,
    pub bank: Option<String>,
    pub source: Option<String>,
}

/// Validated review, immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReview {
    pub text: String,
    pub rating: u8,              // 1..=5
    #[serde(rename = "bank")]
    pub group_id: String,        // partition key, e.g. the bank
    pub date: String,            // YYYY-MM-DD
    pub source: String,
}

impl RawReview {
    pub fn new(
        text: impl Into<String>,
        rating: u8,
        group_id: impl Into<String>,
        date: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            rating,
            group_id: group_id.into(),
            date: date.into(),
            source: source.into(),
        }
    }
}

/// Output of the normalizer for a single text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedText {
    pub normalized_text: String,
    pub tokens: Vec<String>,
}

/// A raw review together with its cleaned text and token sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedReview {
    pub review: RawReview,
    pub normalized_text: String,
    pub tokens: Vec<String>,
}

impl NormalizedReview {
    pub fn new(review: RawReview, normalized: NormalizedText) -> Self {
        Self {
            review,
            normalized_text: normalized.normalized_text,
            tokens: normalized.tokens,
        }
    }

    pub fn group_id(&self) -> &str {
        &self.review.group_id
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn char_count(&self) -> usize {
        self.normalized_text.chars().count()
    }
}
