// Bank review preprocessing library

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod error;
pub mod ingest;
pub mod lemmatizer;
pub mod models;
pub mod processor;
pub mod stopwords;

pub use config::{NormalizerConfig, TokenizerBackend};
pub use error::{PreprocessingError, Result};
pub use ingest::{load_records, IngestStats, ReviewIngestor};
pub use lemmatizer::{LemmaTable, Lemmatizer, RuleLemmatizer};
pub use models::{NormalizedReview, NormalizedText, RawReview, ReviewRecord};
pub use processor::Normalizer;
pub use stopwords::{is_stop_word, stop_word_set, STOP_WORDS};
