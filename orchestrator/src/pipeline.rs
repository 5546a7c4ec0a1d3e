use anyhow::Result;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use bankreview_preprocessing::{NormalizedReview, NormalizedText, Normalizer, RawReview};
use bankreview_themes::{GroupKeywords, KeywordExtractor, ThemeClassifier};
use inference::{SentimentClassifier, Strategy};
use insights::{group_by, Aggregator, AnnotatedReview, InsightsReport};

use crate::config::PipelineConfig;

/// Per-record stages: normalize, then sentiment and themes on the normalized text.
pub struct Annotator {
    normalizer: Normalizer,
    sentiment: SentimentClassifier,
    themes: ThemeClassifier,
}

impl Annotator {
    pub fn new(normalizer: Normalizer, sentiment: SentimentClassifier, themes: ThemeClassifier) -> Self {
        Self {
            normalizer,
            sentiment,
            themes,
        }
    }

    /// Annotates one review. A classifier panic degrades only this review to
    /// NEUTRAL with no themes; its normalized text is kept.
    pub fn annotate(&self, index: usize, review: RawReview) -> AnnotatedReview {
        let normalized = self.normalizer.normalize_review(review);
        let text = normalized.normalized_text.as_str();
        let classified = panic::catch_unwind(AssertUnwindSafe(|| {
            (self.sentiment.classify(text), self.themes.classify(text))
        }));

        match classified {
            Ok((sentiment, themes)) => {
                debug!(
                    "Annotated review {} for {}: {} ({:.3}), themes [{}]",
                    index,
                    normalized.group_id(),
                    sentiment.label,
                    sentiment.score,
                    themes.themes.join(", ")
                );
                AnnotatedReview::new(normalized, sentiment, themes)
            }
            Err(_) => {
                warn!(
                    "Review {} for {} failed to annotate, degrading to NEUTRAL with no themes",
                    index,
                    normalized.group_id()
                );
                AnnotatedReview::degraded(normalized)
            }
        }
    }

    /// Fallback for a review whose worker died: normalized when possible,
    /// NEUTRAL with no themes.
    pub fn degrade(&self, review: RawReview) -> AnnotatedReview {
        let normalized = panic::catch_unwind(AssertUnwindSafe(|| self.normalizer.normalize_review(review.clone())))
            .unwrap_or_else(|_| NormalizedReview::new(review, NormalizedText::default()));
        AnnotatedReview::degraded(normalized)
    }

    pub fn sentiment_strategy(&self) -> Strategy {
        self.sentiment.strategy()
    }
}

/// Annotated records in input order plus per-group keyword rankings.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub annotated: Vec<AnnotatedReview>,
    pub keywords: BTreeMap<String, GroupKeywords>,
}

pub struct PipelineOrchestrator {
    annotator: Arc<Annotator>,
    extractor: Arc<KeywordExtractor>,
    aggregator: Aggregator,
    batch_size: usize,
    workers: usize,
}

impl PipelineOrchestrator {
    /// Builds every stage; the sentiment strategy is chosen here, once.
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        info!("Initializing Pipeline Orchestrator...");
        config.validate()?;

        let normalizer = Normalizer::new(&config.normalizer)?;
        let sentiment = SentimentClassifier::new(&config.sentiment)?;
        let themes = ThemeClassifier::from_config(&config.themes)?;
        let extractor = KeywordExtractor::new(config.keywords.clone())?;
        let aggregator = Aggregator::new(config.insights.clone(), themes.taxonomy())?;

        info!(
            "Pipeline ready: sentiment via {}, {} themes, {} workers x {} records",
            sentiment.strategy().as_str(),
            themes.taxonomy().len(),
            config.workers,
            config.batch_size
        );

        Ok(Self::from_parts(
            Annotator::new(normalizer, sentiment, themes),
            extractor,
            aggregator,
            config.batch_size,
            config.workers,
        ))
    }

    pub fn from_parts(
        annotator: Annotator,
        extractor: KeywordExtractor,
        aggregator: Aggregator,
        batch_size: usize,
        workers: usize,
    ) -> Self {
        Self {
            annotator: Arc::new(annotator),
            extractor: Arc::new(extractor),
            aggregator,
            batch_size: batch_size.max(1),
            workers: workers.max(1),
        }
    }

    pub fn sentiment_strategy(&self) -> Strategy {
        self.annotator.sentiment_strategy()
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub async fn run(&self, reviews: Vec<RawReview>) -> PipelineOutput {
        let annotated = self.annotate_all(reviews).await;
        let keywords = self.extract_keywords(&annotated).await;
        PipelineOutput { annotated, keywords }
    }

    pub fn report(&self, output: &PipelineOutput) -> InsightsReport {
        self.aggregator.build_report(&output.annotated, &output.keywords)
    }

    /// Annotates every review on blocking workers. Output order and length
    /// match the input; failures degrade single reviews to NEUTRAL with no
    /// themes.
    pub async fn annotate_all(&self, reviews: Vec<RawReview>) -> Vec<AnnotatedReview> {
        let total = reviews.len();
        let chunks: Vec<Vec<RawReview>> = reviews.chunks(self.batch_size).map(|c| c.to_vec()).collect();
        info!("Annotating {} reviews in {} chunks", total, chunks.len());

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        for (idx, chunk) in chunks.iter().cloned().enumerate() {
            let annotator = Arc::clone(&self.annotator);
            let semaphore = Arc::clone(&semaphore);
            let offset = idx * self.batch_size;
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let outcome = tokio::task::spawn_blocking(move || {
                    chunk
                        .into_iter()
                        .enumerate()
                        .map(|(i, review)| annotator.annotate(offset + i, review))
                        .collect::<Vec<_>>()
                })
                .await;
                (idx, outcome)
            });
        }

        let mut slots: Vec<Option<Vec<AnnotatedReview>>> = vec![None; chunks.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, Ok(annotated))) => slots[idx] = Some(annotated),
                Ok((idx, Err(e))) => warn!("Annotation chunk {} failed: {}", idx, e),
                Err(e) => warn!("Annotation task failed: {}", e),
            }
        }

        let mut annotated = Vec::with_capacity(total);
        for (slot, chunk) in slots.into_iter().zip(chunks) {
            match slot {
                Some(done) => annotated.extend(done),
                None => {
                    warn!("Degrading {} reviews to NEUTRAL with no themes", chunk.len());
                    annotated.extend(chunk.into_iter().map(|review| self.annotator.degrade(review)));
                }
            }
        }

        info!("Annotated {} reviews", annotated.len());
        annotated
    }

    /// Fits a fresh keyword model per group, one blocking task each.
    pub async fn extract_keywords(&self, annotated: &[AnnotatedReview]) -> BTreeMap<String, GroupKeywords> {
        let mut tasks = JoinSet::new();
        let mut keywords = BTreeMap::new();

        for (group_id, reviews) in group_by(annotated) {
            let texts: Vec<String> = reviews.iter().map(|r| r.review.normalized_text.clone()).collect();
            let extractor = Arc::clone(&self.extractor);
            let group_id = group_id.to_string();
            keywords.insert(group_id.clone(), GroupKeywords::default());

            tasks.spawn_blocking(move || {
                let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
                let extracted = extractor.fit_extract(&refs);
                (group_id, extracted)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((group_id, extracted)) => {
                    debug!(
                        "{}: {} keywords, {} bigrams, {} trigrams",
                        group_id,
                        extracted.terms.len(),
                        extracted.bigrams.len(),
                        extracted.trigrams.len()
                    );
                    keywords.insert(group_id, extracted);
                }
                Err(e) => warn!("Keyword extraction task failed: {}", e),
            }
        }

        keywords
    }
}
