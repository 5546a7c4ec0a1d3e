//! Fixed theme-to-action mapping. Themes without an entry yield nothing.

use crate::schema::{Priority, Recommendation, ThemeCount};
use bankreview_themes::taxonomy::{APP_PERFORMANCE, RELIABILITY_ISSUES, TRANSACTIONS};

pub fn for_pain_point(theme: &ThemeCount) -> Option<Recommendation> {
    let (area, action, rationale) = match theme.theme.as_str() {
        TRANSACTIONS => (
            "Transactions",
            "Optimize transaction processing speed and reliability",
            "negative reviews mention transaction issues",
        ),
        APP_PERFORMANCE => (
            "App Performance",
            "Improve app loading times and reduce crashes",
            "negative reviews mention performance issues",
        ),
        RELIABILITY_ISSUES => (
            "Reliability",
            "Address app crashes and error messages",
            "negative reviews mention reliability problems",
        ),
        _ => return None,
    };

    Some(Recommendation {
        priority: Priority::High,
        area: area.to_string(),
        recommendation: action.to_string(),
        rationale: format!("{} {}", theme.count, rationale),
    })
}

pub fn for_driver(theme: &ThemeCount) -> Option<Recommendation> {
    match theme.theme.as_str() {
        APP_PERFORMANCE => Some(Recommendation {
            priority: Priority::Medium,
            area: "Performance Maintenance".to_string(),
            recommendation: "Continue optimizing app performance as it is a key strength".to_string(),
            rationale: format!("{} positive reviews highlight good performance", theme.count),
        }),
        _ => None,
    }
}

/// Pain-point recommendations first, then driver recommendations.
pub fn generate(pain_points: &[ThemeCount], drivers: &[ThemeCount]) -> Vec<Recommendation> {
    pain_points
        .iter()
        .filter_map(for_pain_point)
        .chain(drivers.iter().filter_map(for_driver))
        .collect()
}
