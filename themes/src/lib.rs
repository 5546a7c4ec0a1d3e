// Theme tagging and keyword extraction for bank reviews

pub mod error;
pub mod keywords;
pub mod taxonomy;
pub mod themes;

pub use error::{Result, ThemeError};
pub use keywords::{GroupKeywords, KeywordConfig, KeywordExtractor, KeywordKind, KeywordRow, NgramCount, RankedTerm};
pub use taxonomy::{Taxonomy, ThemeDefinition};
pub use themes::{ThemeAssignment, ThemeClassifier, ThemeConfig, ThemeScore, DEFAULT_THEME_THRESHOLD};
