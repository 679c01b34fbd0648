//! Run summary

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{CheckResult, SuiteResult};

/// Pass/fail counts for one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub passed: usize,
    pub failed: usize,
}

/// Aggregate counts over a run's results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Suites that did not run; they contribute nothing to the counts above
    #[serde(default)]
    pub skipped_suites: usize,
    pub by_category: BTreeMap<String, CategoryCounts>,
}

impl RunSummary {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a CheckResult>) -> Self {
        let mut summary = RunSummary::default();
        for result in results {
            summary.total += 1;
            let counts = summary
                .by_category
                .entry(result.category.clone())
                .or_default();
            if result.passed {
                summary.passed += 1;
                counts.passed += 1;
            } else {
                summary.failed += 1;
                counts.failed += 1;
            }
        }
        summary
    }

    pub fn with_suites(mut self, suites: &[SuiteResult]) -> Self {
        self.skipped_suites = suites.iter().filter(|s| s.is_skipped()).count();
        self
    }

    /// The automation contract: a run succeeds only with zero failures.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}
