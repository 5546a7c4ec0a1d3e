use crate::bias::ethical_considerations;
use crate::config::InsightsConfig;
use crate::error::Result;
use crate::recommendations;
use crate::schema::{
    AnnotatedReview, Drivers, GroupReport, InsightsReport, PainPoints, SentimentAnalysis, SentimentCounts,
    SummaryStatistics, ThemeAnalysis, ThemeClusterRow, ThemeCount, ThemeSamples,
};
use bankreview_themes::{GroupKeywords, Taxonomy};
use inference::SentimentLabel;
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, HashMap};

/// Partitions reviews by group, preserving input order inside each group.
pub fn group_by(reviews: &[AnnotatedReview]) -> BTreeMap<&str, Vec<&AnnotatedReview>> {
    let mut groups: BTreeMap<&str, Vec<&AnnotatedReview>> = BTreeMap::new();
    for review in reviews {
        groups.entry(review.group_id()).or_default().push(review);
    }
    groups
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let values: Vec<f64> = values.into_iter().collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().mean())
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Turns annotated reviews into group-level statistics and recommendations.
pub struct Aggregator {
    config: InsightsConfig,
    taxonomy: Taxonomy,
}

impl Aggregator {
    pub fn new(config: InsightsConfig, taxonomy: &Taxonomy) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            taxonomy: taxonomy.clone(),
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: InsightsConfig::default(),
            taxonomy: Taxonomy::default(),
        }
    }

    pub fn config(&self) -> &InsightsConfig {
        &self.config
    }

    pub fn build_report(
        &self,
        reviews: &[AnnotatedReview],
        keywords: &BTreeMap<String, GroupKeywords>,
    ) -> InsightsReport {
        tracing::info!("Aggregating {} annotated reviews", reviews.len());

        let mut report = InsightsReport {
            summary_statistics: self.summary_statistics(reviews),
            sentiment_analysis: BTreeMap::new(),
            theme_analysis: BTreeMap::new(),
            pain_points: BTreeMap::new(),
            drivers: BTreeMap::new(),
            recommendations: BTreeMap::new(),
            ethical_considerations: ethical_considerations(reviews, &self.config.bias),
        };

        let empty = GroupKeywords::default();
        for (group_id, group) in group_by(reviews) {
            let group_keywords = keywords.get(group_id).unwrap_or(&empty);
            let group_report = self.group_report(group_id, &group, group_keywords);
            tracing::debug!(
                "{}: {} reviews, {} recommendations",
                group_id,
                group_report.sentiment.total_reviews,
                group_report.recommendations.len()
            );

            let key = group_report.group_id;
            report.sentiment_analysis.insert(key.clone(), group_report.sentiment);
            report.theme_analysis.insert(key.clone(), group_report.themes);
            report.pain_points.insert(key.clone(), group_report.pain_points);
            report.drivers.insert(key.clone(), group_report.drivers);
            report.recommendations.insert(key, group_report.recommendations);
        }

        report
    }

    pub fn group_report(&self, group_id: &str, reviews: &[&AnnotatedReview], keywords: &GroupKeywords) -> GroupReport {
        let pain_points = self.pain_points(reviews);
        let drivers = self.drivers(reviews);
        let recommendations = recommendations::generate(&pain_points.top_pain_points, &drivers.top_drivers);

        GroupReport {
            group_id: group_id.to_string(),
            sentiment: self.sentiment_analysis(reviews),
            themes: self.theme_analysis(reviews, keywords),
            pain_points,
            drivers,
            recommendations,
        }
    }

    pub fn summary_statistics(&self, reviews: &[AnnotatedReview]) -> SummaryStatistics {
        let distribution: SentimentCounts = reviews.iter().collect();

        let mut by_rating: BTreeMap<u8, SentimentCounts> = BTreeMap::new();
        for review in reviews {
            by_rating.entry(review.rating()).or_default().add(review.label());
        }

        SummaryStatistics {
            total_reviews: reviews.len(),
            banks_analyzed: group_by(reviews).len(),
            overall_positive_pct: distribution.percentage(SentimentLabel::Positive),
            overall_avg_rating: mean(reviews.iter().map(|r| r.rating() as f64)).unwrap_or(0.0),
            sentiment_distribution: distribution,
            sentiment_by_rating: by_rating,
        }
    }

    pub fn sentiment_analysis(&self, reviews: &[&AnnotatedReview]) -> SentimentAnalysis {
        let distribution: SentimentCounts = reviews.iter().copied().collect();

        let mut rating_distribution: BTreeMap<u8, usize> = BTreeMap::new();
        for review in reviews {
            *rating_distribution.entry(review.rating()).or_insert(0) += 1;
        }

        SentimentAnalysis {
            total_reviews: reviews.len(),
            avg_rating: mean(reviews.iter().map(|r| r.rating() as f64)).unwrap_or(0.0),
            positive_pct: distribution.percentage(SentimentLabel::Positive),
            avg_sentiment_score: mean(reviews.iter().map(|r| r.sentiment.score)).unwrap_or(0.0),
            sentiment_distribution: distribution,
            rating_distribution,
        }
    }

    pub fn theme_analysis(&self, reviews: &[&AnnotatedReview], keywords: &GroupKeywords) -> ThemeAnalysis {
        let distribution = self.theme_counts(reviews.iter().copied());

        ThemeAnalysis {
            total_theme_mentions: distribution.iter().map(|t| t.count).sum(),
            unique_themes: distribution.len(),
            top_themes: distribution.iter().take(self.config.top_themes).cloned().collect(),
            theme_distribution: distribution,
            top_keywords: keywords.terms.iter().take(self.config.top_keywords).cloned().collect(),
            top_bigrams: keywords.bigrams.clone(),
            top_trigrams: keywords.trigrams.clone(),
            sample_reviews: self.sample_reviews(reviews),
        }
    }

    pub fn pain_points(&self, reviews: &[&AnnotatedReview]) -> PainPoints {
        let negative: Vec<&AnnotatedReview> = reviews
            .iter()
            .copied()
            .filter(|r| r.label() == SentimentLabel::Negative)
            .collect();

        let mut top = self.theme_counts(negative.iter().copied());
        top.truncate(self.config.top_pain_points);

        PainPoints {
            negative_review_count: negative.len(),
            negative_percentage: percentage(negative.len(), reviews.len()),
            top_pain_points: top,
            avg_rating_negative: mean(negative.iter().map(|r| r.rating() as f64)),
        }
    }

    pub fn drivers(&self, reviews: &[&AnnotatedReview]) -> Drivers {
        let positive: Vec<&AnnotatedReview> = reviews
            .iter()
            .copied()
            .filter(|r| r.label() == SentimentLabel::Positive)
            .collect();

        let mut top = self.theme_counts(positive.iter().copied());
        top.truncate(self.config.top_drivers);

        Drivers {
            positive_review_count: positive.len(),
            positive_percentage: percentage(positive.len(), reviews.len()),
            top_drivers: top,
            avg_rating_positive: mean(positive.iter().map(|r| r.rating() as f64)),
        }
    }

    /// One row per theme present in each group, with its share of the group's reviews.
    pub fn theme_clusters(&self, reviews: &[AnnotatedReview]) -> Vec<ThemeClusterRow> {
        group_by(reviews)
            .into_iter()
            .flat_map(|(group_id, group)| {
                let total = group.len();
                self.theme_counts(group.into_iter())
                    .into_iter()
                    .map(move |t| ThemeClusterRow {
                        bank: group_id.to_string(),
                        percentage: percentage(t.count, total),
                        theme: t.theme,
                        review_count: t.count,
                    })
            })
            .collect()
    }

    /// Counts theme mentions, most frequent first, ties in taxonomy order.
    fn theme_counts<'a>(&self, reviews: impl Iterator<Item = &'a AnnotatedReview>) -> Vec<ThemeCount> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for review in reviews {
            for theme in &review.themes.themes {
                *counts.entry(theme.as_str()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<ThemeCount> = counts
            .into_iter()
            .map(|(theme, count)| ThemeCount {
                theme: theme.to_string(),
                count,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| self.theme_rank(&a.theme).cmp(&self.theme_rank(&b.theme)))
                .then_with(|| a.theme.cmp(&b.theme))
        });
        ranked
    }

    fn theme_rank(&self, theme: &str) -> usize {
        self.taxonomy.position(theme).unwrap_or(self.taxonomy.len())
    }

    fn sample_reviews(&self, reviews: &[&AnnotatedReview]) -> Vec<ThemeSamples> {
        self.taxonomy
            .tags()
            .filter_map(|theme| {
                let samples: Vec<String> = reviews
                    .iter()
                    .filter(|r| r.themes.contains(theme))
                    .take(self.config.samples_per_theme)
                    .map(|r| r.review.review.text.clone())
                    .collect();
                (!samples.is_empty()).then(|| ThemeSamples {
                    theme: theme.to_string(),
                    reviews: samples,
                })
            })
            .collect()
    }
}
