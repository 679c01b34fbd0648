//! Check Result Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a single validation check.
///
/// `risk` and `recommendation` are only filled for failures. Nothing
/// enforces that; the constructors below just make the usual shapes easy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check identifier, e.g. "Workspace Access: Provider"
    pub name: String,
    /// Grouping tag, e.g. "Isolation"
    pub category: String,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Security implication of the failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl CheckResult {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        passed: bool,
        details: Option<String>,
        risk: Option<String>,
        recommendation: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            passed,
            details,
            risk,
            recommendation,
            timestamp: Utc::now(),
        }
    }

    pub fn pass(
        name: impl Into<String>,
        category: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self::new(name, category, true, Some(details.into()), None, None)
    }

    pub fn fail(
        name: impl Into<String>,
        category: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self::new(name, category, false, Some(details.into()), None, None)
    }

    pub fn with_risk(mut self, risk: impl Into<String>) -> Self {
        self.risk = Some(risk.into());
        self
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    /// Failed and annotated with a risk; these are called out in the summary.
    pub fn is_risky_failure(&self) -> bool {
        !self.passed && self.risk.as_deref().is_some_and(|r| !r.trim().is_empty())
    }
}
