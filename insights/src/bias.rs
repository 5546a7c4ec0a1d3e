//! Dataset-level sampling bias heuristics.

use crate::config::BiasThresholds;
use crate::schema::AnnotatedReview;
use inference::SentimentLabel;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

pub fn ethical_considerations(reviews: &[AnnotatedReview], thresholds: &BiasThresholds) -> Vec<String> {
    let mut considerations = Vec::new();
    if reviews.is_empty() {
        return considerations;
    }

    let total = reviews.len() as f64;

    let negative_share = reviews.iter().filter(|r| r.label() == SentimentLabel::Negative).count() as f64 / total;
    if negative_share > thresholds.negative_share {
        considerations.push(format!(
            "High negative bias: {:.1}% of reviews are negative. Users more likely to review when dissatisfied.",
            negative_share * 100.0
        ));
    }

    let one_star = reviews.iter().filter(|r| r.rating() == 1).count() as f64 / total;
    let five_star = reviews.iter().filter(|r| r.rating() == 5).count() as f64 / total;
    if one_star > thresholds.extreme_rating_share || five_star > thresholds.extreme_rating_share {
        considerations.push(
            "Polarized ratings: Many 1-star and 5-star reviews suggest emotional rather than balanced feedback."
                .to_string(),
        );
    }

    if let Some(cv) = group_size_variation(reviews) {
        if cv > thresholds.group_size_cv {
            considerations.push("Uneven sample sizes across banks may affect comparative analysis.".to_string());
        }
    }

    considerations
}

/// Sample standard deviation over mean of per-group review counts. `None`
/// with fewer than two groups.
pub fn group_size_variation(reviews: &[AnnotatedReview]) -> Option<f64> {
    let mut sizes: BTreeMap<&str, f64> = BTreeMap::new();
    for review in reviews {
        *sizes.entry(review.group_id()).or_insert(0.0) += 1.0;
    }
    if sizes.len() < 2 {
        return None;
    }

    let mean = sizes.values().mean();
    let std_dev = sizes.values().std_dev();
    let cv = std_dev / mean;
    cv.is_finite().then_some(cv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankreview_preprocessing::{NormalizedReview, NormalizedText, RawReview};
    use bankreview_themes::ThemeAssignment;
    use inference::SentimentResult;

    fn review(bank: &str, rating: u8, label: SentimentLabel) -> AnnotatedReview {
        let raw = RawReview::new("text", rating, bank, "2024-05-01", "Google Play Store");
        AnnotatedReview::new(
            NormalizedReview::new(raw, NormalizedText::default()),
            SentimentResult::new(label, 0.8),
            ThemeAssignment::empty(),
        )
    }

    #[test]
    fn test_balanced_dataset_has_no_flags() {
        let reviews = vec![
            review("A", 1, SentimentLabel::Negative),
            review("A", 3, SentimentLabel::Neutral),
            review("A", 5, SentimentLabel::Positive),
            review("B", 2, SentimentLabel::Negative),
            review("B", 4, SentimentLabel::Positive),
            review("B", 3, SentimentLabel::Neutral),
        ];

        assert!(ethical_considerations(&reviews, &BiasThresholds::default()).is_empty());
        assert_eq!(group_size_variation(&reviews), Some(0.0));
    }

    #[test]
    fn test_negative_and_polarized_flags() {
        let reviews = vec![
            review("A", 1, SentimentLabel::Negative),
            review("A", 1, SentimentLabel::Negative),
            review("A", 1, SentimentLabel::Negative),
            review("A", 2, SentimentLabel::Positive),
        ];
        let flags = ethical_considerations(&reviews, &BiasThresholds::default());

        assert_eq!(flags.len(), 2);
        assert_eq!(
            flags[0],
            "High negative bias: 75.0% of reviews are negative. Users more likely to review when dissatisfied."
        );
        assert!(flags[1].starts_with("Polarized ratings"));
    }

    #[test]
    fn test_uneven_groups() {
        let mut reviews: Vec<AnnotatedReview> = (0..3).map(|_| review("A", 3, SentimentLabel::Neutral)).collect();
        reviews.push(review("B", 3, SentimentLabel::Neutral));

        // counts 3 and 1: std 1.414, mean 2
        let cv = group_size_variation(&reviews).unwrap();
        assert!((cv - 0.7071).abs() < 1e-3);

        let flags = ethical_considerations(&reviews, &BiasThresholds::default());
        assert_eq!(flags, vec!["Uneven sample sizes across banks may affect comparative analysis."]);
    }

    #[test]
    fn test_single_group_never_uneven() {
        let reviews = vec![review("A", 3, SentimentLabel::Neutral)];
        assert_eq!(group_size_variation(&reviews), None);
        assert!(ethical_considerations(&[], &BiasThresholds::default()).is_empty());
    }
}
