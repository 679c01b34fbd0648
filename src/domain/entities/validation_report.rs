//! Validation Report Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CheckResult, SuiteResult};
use crate::domain::services::RunSummary;

/// The document written at the end of a validation run.
///
/// Flat by construction: suites and results are plain lists, never nested
/// inside each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub tool_version: String,
    /// `validation` for a full run, otherwise the selected suite's slug
    pub label: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub summary: RunSummary,
    pub suites: Vec<SuiteResult>,
    pub results: Vec<CheckResult>,
}

impl ValidationReport {
    /// `<label>-results-<YYYYMMDD-HHMMSS>.json`
    pub fn file_name(&self) -> String {
        format!(
            "{}-results-{}.json",
            self.label,
            self.started_at.format("%Y%m%d-%H%M%S")
        )
    }

    pub fn is_success(&self) -> bool {
        self.summary.is_success()
    }
}
