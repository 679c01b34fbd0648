//! Event shapes for the `--json` stream.

use serde::Serialize;

use fabric_wall::application::ProvisionAction;
use fabric_wall::domain::entities::{CheckResult, SuiteResult};
use fabric_wall::domain::services::RunSummary;

/// Event emitted when a command starts.
#[derive(Debug, Clone, Serialize)]
pub struct StartEvent<'a> {
    pub event: &'static str,
    pub command: &'a str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'a str>,
}

impl<'a> StartEvent<'a> {
    pub fn new(command: &'a str) -> Self {
        Self {
            event: "start",
            command,
            version: env!("CARGO_PKG_VERSION"),
            label: None,
        }
    }

    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }
}

/// One recorded check
#[derive(Debug, Clone, Serialize)]
pub struct CheckEvent<'a> {
    pub event: &'static str,
    #[serde(flatten)]
    pub result: &'a CheckResult,
}

impl<'a> CheckEvent<'a> {
    pub fn new(result: &'a CheckResult) -> Self {
        Self {
            event: "check",
            result,
        }
    }
}

/// A suite finished or was skipped
#[derive(Debug, Clone, Serialize)]
pub struct SuiteEvent<'a> {
    pub event: &'static str,
    #[serde(flatten)]
    pub suite: &'a SuiteResult,
}

impl<'a> SuiteEvent<'a> {
    pub fn new(suite: &'a SuiteResult) -> Self {
        Self {
            event: "suite",
            suite,
        }
    }
}

/// One provisioning action
#[derive(Debug, Clone, Serialize)]
pub struct ActionEvent<'a> {
    pub event: &'static str,
    pub step: &'static str,
    pub target: &'a str,
    pub status: &'static str,
}

impl<'a> ActionEvent<'a> {
    pub fn new(action: &'a ProvisionAction) -> Self {
        Self {
            event: "action",
            step: action.step.as_str(),
            target: &action.target,
            status: action.status.as_str(),
        }
    }
}

/// Event emitted when a command completes.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteEvent<'a> {
    pub event: &'static str,
    pub command: &'a str,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<&'a RunSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

impl<'a> CompleteEvent<'a> {
    pub fn new(command: &'a str, success: bool) -> Self {
        Self {
            event: "complete",
            command,
            success,
            summary: None,
            report: None,
        }
    }

    pub fn with_summary(mut self, summary: &'a RunSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn with_report(mut self, report: Option<String>) -> Self {
        self.report = report;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabric_wall::application::{ActionStatus, ProvisionStep};

    #[test]
    fn check_event_flattens_result() {
        let result = CheckResult::fail("Row-Level Security", "SQL Security", "none")
            .with_risk("All rows visible");
        let json = serde_json::to_value(CheckEvent::new(&result)).unwrap();
        assert_eq!(json["event"], "check");
        assert_eq!(json["name"], "Row-Level Security");
        assert_eq!(json["passed"], false);
        assert_eq!(json["risk"], "All rows visible");
    }

    #[test]
    fn suite_event_carries_status_and_reason() {
        let suite = SuiteResult::skipped("Power BI", "skipped by --skip-powerbi");
        let json = serde_json::to_value(SuiteEvent::new(&suite)).unwrap();
        assert_eq!(json["event"], "suite");
        assert_eq!(json["status"], "SKIPPED");
        assert_eq!(json["reason"], "skipped by --skip-powerbi");
    }

    #[test]
    fn action_event_uses_slugs() {
        let action = ProvisionAction {
            step: ProvisionStep::DataAccess,
            target: "ConsumerSharedRead".to_string(),
            status: ActionStatus::Planned,
        };
        let json = serde_json::to_value(ActionEvent::new(&action)).unwrap();
        assert_eq!(json["step"], "data-access");
        assert_eq!(json["status"], "planned");
    }

    #[test]
    fn complete_event_omits_missing_report() {
        let summary = RunSummary::default();
        let json = serde_json::to_value(
            CompleteEvent::new("validate", true)
                .with_summary(&summary)
                .with_report(None),
        )
        .unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["summary"]["total"], 0);
        assert!(json.get("report").is_none());
    }
}
