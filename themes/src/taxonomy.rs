//! The fixed theme taxonomy: an ordered table of theme tag to trigger keywords.
//!
//! Order is significant. It is the enumeration order for assignments and the
//! tie-break when reports rank themes by count.

use crate::{Result, ThemeError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub const APP_PERFORMANCE: &str = "APP_PERFORMANCE";
pub const RELIABILITY_ISSUES: &str = "RELIABILITY_ISSUES";
pub const USER_INTERFACE: &str = "USER_INTERFACE";
pub const SECURITY_ACCESS: &str = "SECURITY_ACCESS";
pub const TRANSACTIONS: &str = "TRANSACTIONS";
pub const CUSTOMER_SUPPORT: &str = "CUSTOMER_SUPPORT";
pub const FEATURE_REQUEST: &str = "FEATURE_REQUEST";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeDefinition {
    pub tag: String,
    pub keywords: Vec<String>,
}

impl ThemeDefinition {
    pub fn new(tag: &str, keywords: &[&str]) -> Self {
        Self {
            tag: tag.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    themes: Vec<ThemeDefinition>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        let themes = vec![
            ThemeDefinition::new(
                APP_PERFORMANCE,
                &["slow", "fast", "speed", "loading", "crash", "freeze", "lag", "performance", "responsive", "smooth", "hanging"],
            ),
            ThemeDefinition::new(
                RELIABILITY_ISSUES,
                &["error", "bug", "glitch", "not working", "problem", "issue", "failed", "broken", "technical", "malfunction", "down"],
            ),
            ThemeDefinition::new(
                USER_INTERFACE,
                &["interface", "design", "layout", "navigation", "menu", "button", "screen", "display", "theme", "color", "font"],
            ),
            ThemeDefinition::new(
                SECURITY_ACCESS,
                &["login", "password", "security", "authentication", "biometric", "fingerprint", "face id", "pin", "verification", "access"],
            ),
            ThemeDefinition::new(
                TRANSACTIONS,
                &["transfer", "payment", "transaction", "send money", "receive", "bill", "airtime", "mobile banking", "fund", "amount"],
            ),
            ThemeDefinition::new(
                CUSTOMER_SUPPORT,
                &["support", "service", "help", "assistance", "response", "contact", "complaint", "feedback", "representative"],
            ),
            ThemeDefinition::new(
                FEATURE_REQUEST,
                &["should", "could", "would", "please add", "need", "want", "missing", "suggestion", "improvement", "enhancement"],
            ),
        ];

        Self { themes }
    }
}

impl Taxonomy {
    /// Builds a taxonomy, lower-casing keywords so matching is case-insensitive.
    pub fn new(themes: Vec<ThemeDefinition>) -> Result<Self> {
        let themes: Vec<ThemeDefinition> = themes
            .into_iter()
            .map(|theme| ThemeDefinition {
                tag: theme.tag.trim().to_string(),
                keywords: theme.keywords.iter().map(|k| k.trim().to_lowercase()).collect(),
            })
            .collect();

        let taxonomy = Self { themes };
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let themes: Vec<ThemeDefinition> = serde_json::from_str(json)?;
        Self::new(themes)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::info!("Loading theme taxonomy from: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let taxonomy = Self::from_json(&content)?;
        tracing::info!("Loaded {} themes", taxonomy.len());
        Ok(taxonomy)
    }

    pub fn validate(&self) -> Result<()> {
        if self.themes.is_empty() {
            return Err(ThemeError::Taxonomy("taxonomy defines no themes".to_string()));
        }

        let mut seen = HashSet::new();
        for theme in &self.themes {
            if theme.tag.is_empty() {
                return Err(ThemeError::Taxonomy("theme tag cannot be empty".to_string()));
            }
            if !seen.insert(theme.tag.as_str()) {
                return Err(ThemeError::Taxonomy(format!("duplicate theme tag: {}", theme.tag)));
            }
            if theme.keywords.is_empty() {
                return Err(ThemeError::Taxonomy(format!("theme {} has no keywords", theme.tag)));
            }
            if theme.keywords.iter().any(|k| k.is_empty()) {
                return Err(ThemeError::Taxonomy(format!("theme {} has an empty keyword", theme.tag)));
            }
        }

        Ok(())
    }

    pub fn themes(&self) -> &[ThemeDefinition] {
        &self.themes
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(|t| t.tag.as_str())
    }

    /// Taxonomy position of a tag, used as the deterministic tie-break.
    pub fn position(&self, tag: &str) -> Option<usize> {
        self.themes.iter().position(|t| t.tag == tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.position(tag).is_some()
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_taxonomy_order() {
        let taxonomy = Taxonomy::default();
        let tags: Vec<&str> = taxonomy.tags().collect();

        assert_eq!(
            tags,
            vec![APP_PERFORMANCE, RELIABILITY_ISSUES, USER_INTERFACE, SECURITY_ACCESS, TRANSACTIONS, CUSTOMER_SUPPORT, FEATURE_REQUEST]
        );
        assert!(taxonomy.validate().is_ok());
        assert_eq!(taxonomy.position(TRANSACTIONS), Some(4));
        assert!(!taxonomy.contains("PRICING"));
    }

    #[test]
    fn test_keywords_lowercased() {
        let taxonomy = Taxonomy::new(vec![ThemeDefinition::new("FEES", &[" Charges ", "HIDDEN FEE"])]).unwrap();
        assert_eq!(taxonomy.themes()[0].keywords, vec!["charges", "hidden fee"]);
    }

    #[test]
    fn test_invalid_taxonomies() {
        assert!(Taxonomy::new(vec![]).is_err());
        assert!(Taxonomy::new(vec![ThemeDefinition::new(" ", &["x"])]).is_err());
        assert!(Taxonomy::new(vec![ThemeDefinition::new("FEES", &[])]).is_err());
        assert!(Taxonomy::new(vec![ThemeDefinition::new("FEES", &["fee", "  "])]).is_err());

        let duplicate = vec![ThemeDefinition::new("FEES", &["fee"]), ThemeDefinition::new("FEES", &["charge"])];
        assert!(matches!(Taxonomy::new(duplicate), Err(ThemeError::Taxonomy(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"tag": "FEES", "keywords": ["fee", "charge"]}}, {{"tag": "CARDS", "keywords": ["card"]}}]"#
        )
        .unwrap();

        let taxonomy = Taxonomy::from_file(file.path()).unwrap();
        assert_eq!(taxonomy.len(), 2);
        assert_eq!(taxonomy.position("CARDS"), Some(1));
    }

    #[test]
    fn test_from_file_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"FEES": ["fee"]}}"#).unwrap();

        assert!(matches!(Taxonomy::from_file(file.path()), Err(ThemeError::Json(_))));
        assert!(matches!(Taxonomy::from_file(Path::new("/nonexistent/taxonomy.json")), Err(ThemeError::Io(_))));
    }
}
