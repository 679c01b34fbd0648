//! Check recorder
//!
//! Every check in a run funnels through [`CheckRecorder`]: it stamps the
//! result, appends it to the run's [`ResultSet`] and notifies the observer
//! (console line or NDJSON event) before the next check starts.

use tracing::debug;

use crate::domain::entities::{CheckResult, ResultSet};
use crate::domain::value_objects::Category;
use crate::error::ApiError;

/// What a check concluded from the data its probe returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub passed: bool,
    pub details: String,
    pub risk: Option<String>,
    pub recommendation: Option<String>,
}

impl Verdict {
    pub fn pass(details: impl Into<String>) -> Self {
        Self {
            passed: true,
            details: details.into(),
            risk: None,
            recommendation: None,
        }
    }

    pub fn fail(details: impl Into<String>) -> Self {
        Self {
            passed: false,
            details: details.into(),
            risk: None,
            recommendation: None,
        }
    }

    pub fn with_risk(mut self, risk: impl Into<String>) -> Self {
        self.risk = Some(risk.into());
        self
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }
}

/// Appends results to a borrowed [`ResultSet`] and reports each one as it lands.
pub struct CheckRecorder<'a> {
    results: &'a mut ResultSet,
    observer: Option<&'a mut dyn FnMut(&CheckResult)>,
}

impl<'a> CheckRecorder<'a> {
    pub fn new(results: &'a mut ResultSet, observer: &'a mut dyn FnMut(&CheckResult)) -> Self {
        Self {
            results,
            observer: Some(observer),
        }
    }

    /// Recorder without an observer
    pub fn silent(results: &'a mut ResultSet) -> Self {
        Self {
            results,
            observer: None,
        }
    }

    /// Append one result. Never fails.
    pub fn record(
        &mut self,
        name: &str,
        category: Category,
        passed: bool,
        details: Option<String>,
        risk: Option<String>,
        recommendation: Option<String>,
    ) {
        let result = CheckResult::new(name, category, passed, details, risk, recommendation);
        debug!(check = %result.name, passed = result.passed, "recorded check");
        if let Some(observer) = self.observer.as_deref_mut() {
            observer(&result);
        }
        self.results.push(result);
    }

    pub fn record_verdict(&mut self, name: &str, category: Category, verdict: Verdict) {
        self.record(
            name,
            category,
            verdict.passed,
            Some(verdict.details),
            verdict.risk,
            verdict.recommendation,
        );
    }

    /// Record a failure caused by a probe error.
    ///
    /// 403s get their own wording so a missing scope is not mistaken for a
    /// missing resource.
    pub fn record_error(&mut self, name: &str, category: Category, error: &ApiError) {
        let (risk, recommendation) = match error {
            ApiError::Forbidden { .. } => (
                "The identity cannot observe this resource, so the control is unverified",
                "Grant the validating identity read access (workspace Viewer or the API scope) and rerun",
            ),
            ApiError::MissingToken => (
                "No credential available; nothing behind this check was verified",
                "Export ACCESS_TOKEN with a token for the Fabric API",
            ),
            _ => (
                "The control could not be verified",
                "Inspect the error details and rerun the validation",
            ),
        };
        self.record(
            name,
            category,
            false,
            Some(error.to_string()),
            Some(risk.to_string()),
            Some(recommendation.to_string()),
        );
    }

    /// Run `fetch`, judge its output and record exactly one result.
    ///
    /// Any error from `fetch` becomes a failed result carrying the error
    /// text. The fetched value is handed back on success so dependent
    /// checks can reuse it without another request.
    pub fn run<T, F, J>(&mut self, name: &str, category: Category, fetch: F, judge: J) -> Option<T>
    where
        F: FnOnce() -> Result<T, ApiError>,
        J: FnOnce(&T) -> Verdict,
    {
        match fetch() {
            Ok(value) => {
                let verdict = judge(&value);
                self.record_verdict(name, category, verdict);
                Some(value)
            }
            Err(error) => {
                debug!(check = name, %error, "probe failed");
                self.record_error(name, category, &error);
                None
            }
        }
    }
}
