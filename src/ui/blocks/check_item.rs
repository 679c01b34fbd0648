use fabric_wall::domain::entities::CheckResult;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// One check as printed during a run:
///
/// ```text
///   ✗ Workspace Access: Consumer - Not found (404): WorkspaceNotFound
///     ↳ Risk: ...
///     ↳ Verify the workspace ID ...
/// ```
pub struct CheckLine<'a> {
    result: &'a CheckResult,
}

impl<'a> CheckLine<'a> {
    pub fn new(result: &'a CheckResult) -> Self {
        Self { result }
    }

    pub fn render(&self, verbose: bool, supports_color: bool, supports_unicode: bool) -> String {
        let r = self.result;
        let icon = Icon::for_outcome(r.passed).colored(supports_color, supports_unicode);
        let arrow = Icon::Arrow.colored(supports_color, supports_unicode);

        let mut out = match r.details.as_deref() {
            Some(details) if !details.is_empty() => {
                format!("  {} {} - {}\n", icon, r.name, details)
            }
            _ => format!("  {} {}\n", icon, r.name),
        };

        if !r.passed || verbose {
            if let Some(risk) = &r.risk {
                out.push_str(&format!(
                    "    {} {} {}\n",
                    arrow,
                    ColoredText::warning("Risk:").render(supports_color),
                    risk
                ));
            }
        }
        if let Some(rec) = &r.recommendation {
            out.push_str(&format!("    {} {}\n", arrow, rec));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_check_shows_risk_and_recommendation() {
        let result = CheckResult::fail("Row-Level Security", "SQL Security", "No security policies found")
            .with_risk("Every row is visible")
            .with_recommendation("Apply `fabric-wall sql-policy rls`");
        let rendered = CheckLine::new(&result).render(false, false, false);
        assert_eq!(
            rendered,
            "  [FAIL] Row-Level Security - No security policies found\n    [>] Risk: Every row is visible\n    [>] Apply `fabric-wall sql-policy rls`\n"
        );
    }

    #[test]
    fn passed_check_is_one_line() {
        let result = CheckResult::pass("Access Token", "Identity", "ACCESS_TOKEN is set");
        let rendered = CheckLine::new(&result).render(false, false, true);
        assert_eq!(rendered, "  ✓ Access Token - ACCESS_TOKEN is set\n");
    }
}
