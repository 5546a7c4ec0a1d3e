use crate::error::{InsightsError, Result};
use serde::{Deserialize, Serialize};

/// Thresholds for the dataset-level bias heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiasThresholds {
    /// Share of NEGATIVE labels above which the dataset reads as complaint-driven.
    pub negative_share: f64,
    /// Share of 1-star or of 5-star ratings above which ratings read as polarized.
    pub extreme_rating_share: f64,
    /// Coefficient of variation of per-group review counts above which samples are uneven.
    pub group_size_cv: f64,
}

impl Default for BiasThresholds {
    fn default() -> Self {
        Self {
            negative_share: 0.7,
            extreme_rating_share: 0.4,
            group_size_cv: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsConfig {
    pub top_themes: usize,
    pub top_pain_points: usize,
    pub top_drivers: usize,
    pub top_keywords: usize,
    pub samples_per_theme: usize,
    pub bias: BiasThresholds,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            top_themes: 5,
            top_pain_points: 3,
            top_drivers: 3,
            top_keywords: 10,
            samples_per_theme: 2,
            bias: BiasThresholds::default(),
        }
    }
}

impl InsightsConfig {
    pub fn validate(&self) -> Result<()> {
        let shares = [
            ("negative_share", self.bias.negative_share),
            ("extreme_rating_share", self.bias.extreme_rating_share),
        ];
        for (name, value) in shares {
            if !(0.0..=1.0).contains(&value) {
                return Err(InsightsError::invalid_config(format!("{} must be within [0, 1], got {}", name, value)));
            }
        }

        if self.bias.group_size_cv.is_nan() || self.bias.group_size_cv < 0.0 {
            return Err(InsightsError::invalid_config("group_size_cv must be non-negative"));
        }

        if self.top_themes == 0 || self.top_pain_points == 0 || self.top_drivers == 0 {
            return Err(InsightsError::invalid_config("top-k sizes must be greater than zero"));
        }

        Ok(())
    }
}
