//! Preparation of loader records into validated [`RawReview`]s.

use crate::models::{RawReview, ReviewRecord};
use crate::{PreprocessingError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;

pub const DEFAULT_SOURCE: &str = "Google Play Store";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestStats {
    pub original_count: usize,
    pub missing_dropped: usize,
    pub empty_removed: usize,
    pub duplicates_removed: usize,
    pub invalid_ratings: usize,
    pub final_count: usize,
}

impl IngestStats {
    pub fn retention_rate(&self) -> f64 {
        if self.original_count == 0 {
            return 0.0;
        }
        self.final_count as f64 / self.original_count as f64 * 100.0
    }

    pub fn error_rate(&self) -> f64 {
        if self.original_count == 0 {
            return 0.0;
        }
        100.0 - self.retention_rate()
    }
}

/// Parses a JSON array of loader records.
pub fn load_records<R: Read>(reader: R) -> Result<Vec<ReviewRecord>> {
    serde_json::from_reader(reader)
        .map_err(|e| PreprocessingError::DataLoad(format!("malformed review records: {}", e)))
}

pub struct ReviewIngestor {
    today: NaiveDate,
}

impl Default for ReviewIngestor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewIngestor {
    pub fn new() -> Self {
        Self {
            today: Utc::now().date_naive(),
        }
    }

    /// Fixes the date used to fill records that carry none.
    pub fn with_today(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn prepare(&self, records: Vec<ReviewRecord>) -> (Vec<RawReview>, IngestStats) {
        let mut stats = IngestStats {
            original_count: records.len(),
            ..IngestStats::default()
        };
        let mut seen_texts = HashSet::new();
        let mut reviews = Vec::with_capacity(records.len());

        for record in records {
            let (Some(text), Some(rating), Some(bank)) = (record.review, record.rating, record.bank) else {
                stats.missing_dropped += 1;
                continue;
            };

            let text = collapse_whitespace(&text);
            if text.is_empty() {
                stats.empty_removed += 1;
                continue;
            }

            if !seen_texts.insert(text.clone()) {
                stats.duplicates_removed += 1;
                continue;
            }

            if !(1..=5).contains(&rating) {
                stats.invalid_ratings += 1;
                continue;
            }

            let date = match record.date {
                Some(date) => normalize_date(&date),
                None => self.today.format("%Y-%m-%d").to_string(),
            };
            let source = record
                .source
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string());

            reviews.push(RawReview::new(text, rating as u8, bank.trim(), date, source));
        }

        stats.final_count = reviews.len();
        tracing::info!(
            "Prepared {} of {} records ({} missing, {} empty, {} duplicate, {} invalid rating)",
            stats.final_count,
            stats.original_count,
            stats.missing_dropped,
            stats.empty_removed,
            stats.duplicates_removed,
            stats.invalid_ratings
        );

        (reviews, stats)
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes a date to `YYYY-MM-DD`; unparseable input is kept verbatim.
pub fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return datetime.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return datetime.date().format("%Y-%m-%d").to_string();
    }

    tracing::warn!("Could not normalize review date '{}', keeping it as-is", trimmed);
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(review: Option<&str>, rating: Option<i64>, bank: Option<&str>) -> ReviewRecord {
        ReviewRecord {
            review: review.map(str::to_string),
            rating,
            date: Some("2024-01-15".to_string()),
            bank: bank.map(str::to_string),
            source: None,
        }
    }

    #[test]
    fn test_prepare_filters_and_counts() {
        let ingestor = ReviewIngestor::with_today(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let records = vec![
            record(Some("Great  app"), Some(5), Some("CBE")),
            record(Some("Great app"), Some(4), Some("CBE")),
            record(None, Some(3), Some("CBE")),
            record(Some("   "), Some(3), Some("BOA")),
            record(Some("Rating too high"), Some(7), Some("BOA")),
            record(Some("Slow login"), Some(2), Some("BOA")),
        ];

        let (reviews, stats) = ingestor.prepare(records);

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].text, "Great app");
        assert_eq!(reviews[0].source, DEFAULT_SOURCE);
        assert_eq!(reviews[1].group_id, "BOA");
        assert_eq!(stats.original_count, 6);
        assert_eq!(stats.duplicates_removed, 1);
        assert_eq!(stats.missing_dropped, 1);
        assert_eq!(stats.empty_removed, 1);
        assert_eq!(stats.invalid_ratings, 1);
        assert_eq!(stats.final_count, 2);
        assert!((stats.retention_rate() - 100.0 / 3.0).abs() < 1e-9);
        assert!((stats.error_rate() - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_date_filled_with_today() {
        let ingestor = ReviewIngestor::with_today(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let mut rec = record(Some("Works fine"), Some(4), Some("Dashen"));
        rec.date = None;

        let (reviews, _) = ingestor.prepare(vec![rec]);
        assert_eq!(reviews[0].date, "2024-06-01");
    }

    #[test]
    fn test_normalize_date_formats() {
        assert_eq!(normalize_date("2024-02-03"), "2024-02-03");
        assert_eq!(normalize_date("2024-02-03T10:11:12Z"), "2024-02-03");
        assert_eq!(normalize_date("2024-02-03 10:11:12"), "2024-02-03");
        assert_eq!(normalize_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_load_records_malformed() {
        let result = load_records("not json".as_bytes());
        assert!(matches!(result, Err(PreprocessingError::DataLoad(_))));
    }

    #[test]
    fn test_load_records() {
        let json = r#"[{"review": "Nice", "rating": 5, "date": "2024-01-01", "bank": "CBE", "source": "Google Play Store"}]"#;
        let records = load_records(json.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].bank.as_deref(), Some("CBE"));
    }
}
