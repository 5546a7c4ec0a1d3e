use anyhow::{Context, Result};
use bankreview_preprocessing::IngestStats;
use bankreview_themes::KeywordRow;
use chrono::{DateTime, Utc};
use insights::{AnnotatedReview, InsightsReport, ReviewOutputRow};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::pipeline::PipelineOutput;

/// Per-review output rows, `review_id` being the position in the run.
pub fn output_rows(annotated: &[AnnotatedReview]) -> Vec<ReviewOutputRow> {
    annotated
        .iter()
        .enumerate()
        .map(|(idx, review)| review.to_output_row(idx))
        .collect()
}

/// Keyword and bigram rows for every group.
pub fn keyword_rows(output: &PipelineOutput) -> Vec<KeywordRow> {
    output
        .keywords
        .iter()
        .flat_map(|(group_id, keywords)| keywords.rows(group_id))
        .collect()
}

/// Writes `value` as pretty JSON to `path`, or to stdout when `path` is `None`.
pub fn write_json<T: Serialize>(path: Option<&Path>, value: &T) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create output directory {:?}", parent))?;
            }
            let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
            tracing::info!("Wrote {:?}", path);
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, value)?;
            writeln!(handle)?;
        }
    }
    Ok(())
}

/// Human-readable run summary on stderr, keeping stdout free for JSON.
pub struct ResultFormatter {
    start_time: DateTime<Utc>,
}

impl ResultFormatter {
    pub fn new() -> Self {
        Self { start_time: Utc::now() }
    }

    pub fn display_pipeline_start(&self, strategy: &str) {
        eprintln!("\n{}", "-".repeat(20));
        eprintln!("BANK REVIEW ANALYTICS PIPELINE");
        eprintln!("{}", "-".repeat(20));
        eprintln!("Pipeline Flow:");
        eprintln!("   Ingest → Normalize → Sentiment ({}) + Themes → Keywords → Insights", strategy);
        eprintln!("Started: {}", self.start_time.format("%Y-%m-%d %H:%M:%S UTC"));
        eprintln!("{}", "=".repeat(80));
    }

    pub fn display_ingest_stats(&self, stats: &IngestStats) {
        eprintln!("Preprocessing summary:");
        eprintln!("   Original records: {}", stats.original_count);
        eprintln!("   Missing fields dropped: {}", stats.missing_dropped);
        eprintln!("   Empty reviews removed: {}", stats.empty_removed);
        eprintln!("   Duplicates removed: {}", stats.duplicates_removed);
        eprintln!("   Invalid ratings rejected: {}", stats.invalid_ratings);
        eprintln!("   Final records: {} ({:.1}% retained)", stats.final_count, stats.retention_rate());
        eprintln!("   Data error rate: {:.1}%", stats.error_rate());
    }

    pub fn display_report(&self, report: &InsightsReport) {
        let summary = &report.summary_statistics;
        eprintln!("\n{}", "-".repeat(40));
        eprintln!("INSIGHTS SUMMARY");
        eprintln!("{}", "-".repeat(40));
        eprintln!("Total reviews analyzed: {}", summary.total_reviews);
        eprintln!("Overall positive reviews: {:.1}%", summary.overall_positive_pct);

        for (bank, analysis) in &report.sentiment_analysis {
            eprintln!("\n{}:", bank);
            eprintln!("   Average rating: {:.2}", analysis.avg_rating);
            eprintln!("   Positive reviews: {:.1}%", analysis.positive_pct);
            if let Some(pain) = report.pain_points.get(bank) {
                let themes: Vec<&str> = pain.top_pain_points.iter().map(|t| t.theme.as_str()).collect();
                if !themes.is_empty() {
                    eprintln!("   Pain points: {}", themes.join(", "));
                }
            }
        }

        for consideration in &report.ethical_considerations {
            eprintln!("\n⚠ {}", consideration);
        }
    }

    pub fn display_pipeline_complete(&self, reviews: usize) {
        let runtime = Utc::now().signed_duration_since(self.start_time);

        eprintln!("\n{}", "-".repeat(20));
        eprintln!("PIPELINE EXECUTION COMPLETE");
        eprintln!("{}", "-".repeat(20));
        eprintln!("   Total Reviews: {}", reviews);
        eprintln!("   Total Runtime: {}ms", runtime.num_milliseconds());
        eprintln!("{}", "=".repeat(80));
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankreview_preprocessing::{NormalizedReview, NormalizedText, RawReview};
    use bankreview_themes::{GroupKeywords, NgramCount};
    use std::collections::BTreeMap;

    fn annotated(text: &str) -> AnnotatedReview {
        let raw = RawReview::new(text, 4, "Bank A", "2024-05-01", "Google Play Store");
        AnnotatedReview::degraded(NormalizedReview::new(raw, NormalizedText::default()))
    }

    #[test]
    fn test_output_rows_are_numbered() {
        let rows = output_rows(&[annotated("first"), annotated("second")]);

        assert_eq!(rows[0].review_id, 0);
        assert_eq!(rows[1].review_id, 1);
        assert_eq!(rows[1].review_text, "second");
        assert_eq!(rows[1].identified_themes, insights::NO_THEMES);
    }

    #[test]
    fn test_keyword_rows_cover_groups() {
        let mut keywords = BTreeMap::new();
        for bank in ["Bank A", "Bank B"] {
            keywords.insert(
                bank.to_string(),
                GroupKeywords {
                    terms: vec![],
                    bigrams: vec![NgramCount { ngram: "slow app".to_string(), count: 2 }],
                    trigrams: vec![],
                },
            );
        }
        let output = PipelineOutput { annotated: vec![], keywords };
        let rows = keyword_rows(&output);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].bank, "Bank B");
    }

    #[test]
    fn test_write_json_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed").join("rows.json");

        write_json(Some(&path), &output_rows(&[annotated("only")])).unwrap();

        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written[0]["review_text"], "only");
        assert_eq!(written[0]["sentiment_label"], "NEUTRAL");
    }
}
