use bankreview_preprocessing::NormalizedReview;
use bankreview_themes::{NgramCount, RankedTerm, ThemeAssignment};
use inference::{SentimentLabel, SentimentResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder written to `identified_themes` when a review has no theme.
pub const NO_THEMES: &str = "No themes";

/// A normalized review with its sentiment and themes attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedReview {
    pub review: NormalizedReview,
    pub sentiment: SentimentResult,
    pub themes: ThemeAssignment,
}

impl AnnotatedReview {
    pub fn new(review: NormalizedReview, sentiment: SentimentResult, themes: ThemeAssignment) -> Self {
        Self {
            review,
            sentiment,
            themes,
        }
    }

    /// Annotation used when a record could not be processed.
    pub fn degraded(review: NormalizedReview) -> Self {
        Self::new(review, SentimentResult::neutral(), ThemeAssignment::empty())
    }

    pub fn group_id(&self) -> &str {
        self.review.group_id()
    }

    pub fn label(&self) -> SentimentLabel {
        self.sentiment.label
    }

    pub fn rating(&self) -> u8 {
        self.review.review.rating
    }

    pub fn identified_themes(&self) -> String {
        if self.themes.is_empty() {
            NO_THEMES.to_string()
        } else {
            self.themes.themes.join(", ")
        }
    }

    pub fn to_output_row(&self, review_id: usize) -> ReviewOutputRow {
        ReviewOutputRow {
            review_id,
            review_text: self.review.review.text.clone(),
            sentiment_label: self.sentiment.label,
            sentiment_score: self.sentiment.score,
            identified_themes: self.identified_themes(),
            bank: self.review.review.group_id.clone(),
            rating: self.review.review.rating,
            date: self.review.review.date.clone(),
        }
    }
}

/// Per-review output record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutputRow {
    pub review_id: usize,
    pub review_text: String,
    pub sentiment_label: SentimentLabel,
    pub sentiment_score: f64,
    pub identified_themes: String,
    pub bank: String,
    pub rating: u8,
    pub date: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    pub fn add(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Percentage of `label` among all counted records, 0 when empty.
    pub fn percentage(&self, label: SentimentLabel) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.get(label) as f64 / total as f64 * 100.0,
        }
    }
}

impl<'a> FromIterator<&'a AnnotatedReview> for SentimentCounts {
    fn from_iter<I: IntoIterator<Item = &'a AnnotatedReview>>(iter: I) -> Self {
        let mut counts = Self::default();
        for review in iter {
            counts.add(review.label());
        }
        counts
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeCount {
    pub theme: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSamples {
    pub theme: String,
    pub reviews: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_reviews: usize,
    pub banks_analyzed: usize,
    pub overall_positive_pct: f64,
    pub overall_avg_rating: f64,
    pub sentiment_distribution: SentimentCounts,
    pub sentiment_by_rating: BTreeMap<u8, SentimentCounts>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub total_reviews: usize,
    pub avg_rating: f64,
    pub positive_pct: f64,
    pub avg_sentiment_score: f64,
    pub sentiment_distribution: SentimentCounts,
    pub rating_distribution: BTreeMap<u8, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeAnalysis {
    pub total_theme_mentions: usize,
    pub unique_themes: usize,
    pub top_themes: Vec<ThemeCount>,
    pub theme_distribution: Vec<ThemeCount>,
    pub top_keywords: Vec<RankedTerm>,
    pub top_bigrams: Vec<NgramCount>,
    pub top_trigrams: Vec<NgramCount>,
    pub sample_reviews: Vec<ThemeSamples>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PainPoints {
    pub negative_review_count: usize,
    pub negative_percentage: f64,
    pub top_pain_points: Vec<ThemeCount>,
    pub avg_rating_negative: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drivers {
    pub positive_review_count: usize,
    pub positive_percentage: f64,
    pub top_drivers: Vec<ThemeCount>,
    pub avg_rating_positive: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub area: String,
    pub recommendation: String,
    pub rationale: String,
}

/// Everything reported for a single group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupReport {
    pub group_id: String,
    pub sentiment: SentimentAnalysis,
    pub themes: ThemeAnalysis,
    pub pain_points: PainPoints,
    pub drivers: Drivers,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsReport {
    pub summary_statistics: SummaryStatistics,
    pub sentiment_analysis: BTreeMap<String, SentimentAnalysis>,
    pub theme_analysis: BTreeMap<String, ThemeAnalysis>,
    pub pain_points: BTreeMap<String, PainPoints>,
    pub drivers: BTreeMap<String, Drivers>,
    pub recommendations: BTreeMap<String, Vec<Recommendation>>,
    pub ethical_considerations: Vec<String>,
}

impl InsightsReport {
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Per-group theme share for external persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeClusterRow {
    pub bank: String,
    pub theme: String,
    pub review_count: usize,
    pub percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankreview_preprocessing::{NormalizedText, RawReview};
    use bankreview_themes::ThemeScore;

    fn annotated(themes: &[&str]) -> AnnotatedReview {
        let raw = RawReview::new("Crashes during transfer!", 2, "Bank A", "2024-05-01", "Google Play Store");
        let normalized = NormalizedText {
            normalized_text: "crashes during transfer".to_string(),
            tokens: vec!["crash".to_string(), "transfer".to_string()],
        };
        let assignment = ThemeAssignment {
            themes: themes.iter().map(|t| t.to_string()).collect(),
            raw_scores: themes.iter().map(|t| ThemeScore { theme: t.to_string(), score: 2 }).collect(),
        };
        AnnotatedReview::new(
            NormalizedReview::new(raw, normalized),
            SentimentResult::new(SentimentLabel::Negative, 0.8),
            assignment,
        )
    }

    #[test]
    fn test_output_row() {
        let row = annotated(&["APP_PERFORMANCE", "TRANSACTIONS"]).to_output_row(7);

        assert_eq!(row.review_id, 7);
        assert_eq!(row.review_text, "Crashes during transfer!");
        assert_eq!(row.identified_themes, "APP_PERFORMANCE, TRANSACTIONS");
        assert_eq!(row.bank, "Bank A");

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["sentiment_label"], "NEGATIVE");
    }

    #[test]
    fn test_output_row_without_themes() {
        let row = annotated(&[]).to_output_row(0);
        assert_eq!(row.identified_themes, NO_THEMES);
    }

    #[test]
    fn test_sentiment_counts() {
        let reviews = vec![annotated(&[]), annotated(&[])];
        let counts: SentimentCounts = reviews.iter().collect();

        assert_eq!(counts.negative, 2);
        assert_eq!(counts.total(), 2);
        assert_eq!(counts.percentage(SentimentLabel::Negative), 100.0);
        assert_eq!(SentimentCounts::default().percentage(SentimentLabel::Positive), 0.0);

        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json["NEGATIVE"], 2);
    }
}
