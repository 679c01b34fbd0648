use fabric_wall::domain::entities::{CheckResult, SuiteResult, SuiteStatus};
use fabric_wall::domain::services::RunSummary;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;
use crate::ui::widgets::panel::{Panel, PanelStyle};

/// End-of-run box: suite statuses, counts, then every failure with its
/// risk and recommendation.
pub struct RunSummaryBlock<'a> {
    pub summary: &'a RunSummary,
    pub suites: &'a [SuiteResult],
    pub failures: Vec<&'a CheckResult>,
}

impl RunSummaryBlock<'_> {
    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let success = self.summary.is_success();
        let (style, icon, title) = if success {
            (
                PanelStyle::Success,
                Icon::Success,
                ColoredText::success("All checks passed").bold(),
            )
        } else {
            (
                PanelStyle::Error,
                Icon::Error,
                ColoredText::error(format!("{} check(s) failed", self.summary.failed)).bold(),
            )
        };

        let mut panel = Panel::titled(format!(
            "{} {}",
            icon.colored(supports_color, supports_unicode),
            title.render(supports_color)
        ))
        .style(style);
        panel.blank();

        for suite in self.suites {
            let (icon, status) = match suite.status {
                SuiteStatus::Passed => (Icon::Success, ColoredText::success("PASSED")),
                SuiteStatus::Failed => (Icon::Error, ColoredText::error("FAILED")),
                SuiteStatus::Skipped => (Icon::Skipped, ColoredText::dim("SKIPPED")),
            };
            let mut line = format!(
                "{} {:<14} {}",
                icon.colored(supports_color, supports_unicode),
                suite.name,
                status.render(supports_color)
            );
            if let Some(reason) = &suite.reason {
                line.push_str(&ColoredText::dim(format!(" ({})", reason)).render(supports_color));
            }
            panel.line(line);
        }

        panel.blank();
        panel.line(format!(
            "{} total, {} passed, {} failed",
            self.summary.total, self.summary.passed, self.summary.failed
        ));
        if self.summary.skipped_suites > 0 {
            panel.line(format!("{} suite(s) skipped", self.summary.skipped_suites));
        }

        if !self.failures.is_empty() {
            let arrow = Icon::Arrow.colored(supports_color, supports_unicode);
            panel.blank();
            for failure in &self.failures {
                panel.line(format!(
                    "{} {}",
                    Icon::Error.colored(supports_color, supports_unicode),
                    ColoredText::plain(format!("[{}] {}", failure.category, failure.name))
                        .bold()
                        .render(supports_color)
                ));
                if let Some(risk) = &failure.risk {
                    panel.line(format!("  {} Risk: {}", arrow, risk));
                }
                if let Some(rec) = &failure.recommendation {
                    panel.line(format!("  {} {}", arrow, rec));
                }
            }
        }

        panel.render(supports_color, supports_unicode)
    }
}
