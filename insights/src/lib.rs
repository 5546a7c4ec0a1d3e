//! Group-level analytics over annotated bank reviews.

pub mod aggregator;
pub mod bias;
pub mod config;
pub mod error;
pub mod recommendations;
pub mod schema;

pub use aggregator::{group_by, Aggregator};
pub use config::{BiasThresholds, InsightsConfig};
pub use error::{InsightsError, Result};
pub use schema::{
    AnnotatedReview, Drivers, GroupReport, InsightsReport, PainPoints, Priority, Recommendation, ReviewOutputRow,
    SentimentAnalysis, SentimentCounts, SummaryStatistics, ThemeAnalysis, ThemeClusterRow, ThemeCount, ThemeSamples,
    NO_THEMES,
};
