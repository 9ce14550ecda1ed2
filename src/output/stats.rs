//! Statistics for a validation run
//!
//! Counts outcomes per status category and renders the summary printed by the
//! command-line host.

use crate::checker::StatusCategory;
use crate::state::ValidationOutcome;
use std::collections::HashMap;

/// Outcome counts for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Number of outcomes counted
    pub total: usize,

    /// Count of outcomes by category; categories with no outcomes are absent
    pub by_category: HashMap<StatusCategory, usize>,
}

impl RunStatistics {
    pub fn from_outcomes(outcomes: &[ValidationOutcome]) -> Self {
        let mut by_category = HashMap::new();
        for outcome in outcomes {
            *by_category.entry(outcome.category).or_insert(0) += 1;
        }
        Self {
            total: outcomes.len(),
            by_category,
        }
    }

    pub fn count(&self, category: StatusCategory) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }

    /// Client errors, server errors, timeouts, and network errors
    pub fn broken(&self) -> usize {
        StatusCategory::ALL
            .iter()
            .filter(|c| c.is_broken())
            .map(|c| self.count(*c))
            .sum()
    }

    pub fn working(&self) -> usize {
        self.total - self.broken()
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// Broken outcomes are listed individually after the per-category counts.
pub fn print_statistics(page_url: &str, stats: &RunStatistics, outcomes: &[ValidationOutcome]) {
    println!("=== Link Check Results ===\n");
    println!("Page: {}", page_url);
    println!("  Links checked: {}", stats.total);
    println!();

    println!("By Category:");
    for category in StatusCategory::ALL {
        let count = stats.count(category);
        if count == 0 {
            continue;
        }
        let percentage = if stats.total > 0 {
            (count as f64 / stats.total as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", category, count, percentage);
    }
    println!();

    let broken: Vec<_> = outcomes.iter().filter(|o| o.is_broken()).collect();
    if !broken.is_empty() {
        println!("Broken Links ({}):", broken.len());
        for outcome in broken {
            match outcome.status {
                Some(code) => println!("  - [{}] {} ({})", code, outcome.url, outcome.description),
                None => println!("  - {} ({})", outcome.url, outcome.description),
            }
        }
        println!();
    }

    println!("Working: {} / {} links", stats.working(), stats.total);
}
