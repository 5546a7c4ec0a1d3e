use bankreview_preprocessing::{
    load_records, Normalizer, NormalizerConfig, ReviewIngestor, TokenizerBackend,
};

#[test]
fn test_ingest_then_normalize() {
    let json = r#"[
        {"review": "App is SLOW and keeps crashing!!", "rating": 1, "date": "2024-05-01T08:00:00Z", "bank": "CBE"},
        {"review": "Love the new design :)", "rating": 5, "date": "2024-05-02", "bank": "BOA", "source": "App Store"},
        {"review": "App is SLOW and keeps crashing!!", "rating": 2, "bank": "CBE"}
    ]"#;

    let records = load_records(json.as_bytes()).unwrap();
    let (reviews, stats) = ReviewIngestor::new().prepare(records);
    assert_eq!(stats.duplicates_removed, 1);
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].date, "2024-05-01");
    assert_eq!(reviews[1].source, "App Store");

    let normalizer = Normalizer::with_defaults().unwrap();
    let normalized = normalizer.normalize_batch(reviews);

    assert_eq!(normalized[0].normalized_text, "app is slow and keeps crashing");
    assert_eq!(normalized[0].tokens, vec!["app", "slow", "keep", "crash"]);
    assert_eq!(normalized[1].normalized_text, "love the new design");
    assert_eq!(normalized[1].tokens, vec!["love", "new", "design"]);
}

#[test]
fn test_backends_share_output_shape() {
    let linguistic = Normalizer::new(&NormalizerConfig::default()).unwrap();
    let basic = Normalizer::new(&NormalizerConfig::basic()).unwrap();
    let text = Some("Transfers failed twice, support never answered");

    let a = linguistic.normalize(text);
    let b = basic.normalize(text);

    assert_eq!(a.normalized_text, b.normalized_text);
    assert_eq!(linguistic.backend(), TokenizerBackend::Linguistic);
    assert_eq!(b.tokens, vec!["transfers", "failed", "twice", "support", "never", "answered"]);
    assert_eq!(a.tokens, vec!["transfer", "fail", "twice", "support", "never", "answer"]);
}

#[test]
fn test_whitespace_only_text() {
    let normalizer = Normalizer::with_defaults().unwrap();
    let result = normalizer.normalize(Some("   \t\n "));

    assert_eq!(result.normalized_text, "");
    assert!(result.tokens.is_empty());
}
