//! Suite Result Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CheckResult;

/// Tri-state outcome of a suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SuiteStatus {
    Passed,
    Failed,
    Skipped,
}

impl std::fmt::Display for SuiteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuiteStatus::Passed => write!(f, "PASSED"),
            SuiteStatus::Failed => write!(f, "FAILED"),
            SuiteStatus::Skipped => write!(f, "SKIPPED"),
        }
    }
}

/// Coarse record of one suite inside a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteResult {
    pub name: String,
    pub status: SuiteStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub passed: usize,
    #[serde(default)]
    pub failed: usize,
    /// Why the suite did not run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SuiteResult {
    /// Build from the checks the suite recorded. A suite with no failures passes.
    pub fn completed(name: impl Into<String>, results: &[CheckResult]) -> Self {
        let failed = results.iter().filter(|r| !r.passed).count();
        Self {
            name: name.into(),
            status: if failed == 0 {
                SuiteStatus::Passed
            } else {
                SuiteStatus::Failed
            },
            timestamp: Utc::now(),
            passed: results.len() - failed,
            failed,
            reason: None,
        }
    }

    pub fn skipped(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: SuiteStatus::Skipped,
            timestamp: Utc::now(),
            passed: 0,
            failed: 0,
            reason: Some(reason.into()),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.status == SuiteStatus::Skipped
    }
}
